//! Type handles and descriptors.
//!
//! A `TypeDescriptor` is the read-only view of one loaded type. Descriptors are
//! owned by a [`TypeStore`](crate::TypeStore) and handed out behind `Arc`; the
//! resolver only reads and indexes them.
//!
//! ## Generic shapes
//!
//! | Shape | `generic_arity` | `generic_args` | `definition` |
//! |-------|-----------------|----------------|--------------|
//! | Plain type | 0 | empty | `None` |
//! | Generic definition (`Box`1`) | N | empty | `None` |
//! | Constructed type (`Box<Int32>`) | N | N ids | `Some(def)` |
//!
//! Nested types inherit the generic parameters of their declaring type, so
//! `generic_arity` counts inherited parameters as well as the ones declared
//! directly on the type.

use bitflags::bitflags;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Separates a generic definition's simple name from its own arity in
/// metadata names (`Box`1`, `Dictionary`2`).
pub const ARITY_MARKER: char = '`';

/// Inline list of type handles; most generic types take fewer than five arguments.
pub type TypeList = SmallVec<[TypeId; 4]>;

/// Handle to a type registered in a [`TypeStore`](crate::TypeStore).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel value for an invalid handle.
    pub const INVALID: Self = Self(0);

    /// First valid handle.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this handle is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Kind and visibility bits of a type.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u16 {
        /// Visible outside its module; only public types are exported.
        const PUBLIC = 1 << 0;
        /// Copy semantics (structs, primitives other than string/object).
        const VALUE_TYPE = 1 << 1;
        /// Seeded builtin primitive.
        const PRIMITIVE = 1 << 2;
        const INTERFACE = 1 << 3;
        const ABSTRACT = 1 << 4;
    }
}

/// Constraint on a single generic parameter, checked when closing a definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum GenericConstraint {
    #[default]
    None,
    /// Argument must be a value type (`where T : struct`).
    ValueType,
    /// Argument must be a reference type (`where T : class`).
    ReferenceType,
}

impl GenericConstraint {
    /// Whether `argument` satisfies this constraint.
    pub fn admits(self, argument: &TypeDescriptor) -> bool {
        match self {
            GenericConstraint::None => true,
            GenericConstraint::ValueType => argument.is_value_type(),
            GenericConstraint::ReferenceType => !argument.is_value_type(),
        }
    }
}

/// Read-only description of a loaded type.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    pub id: TypeId,

    /// Metadata name: the simple name, followed by the arity marker and the
    /// number of generic parameters declared directly on this type.
    pub metadata_name: Arc<str>,

    /// Namespace of the outermost declaring type (inherited by nested types).
    pub namespace: Option<Arc<str>>,

    /// Name of the module that defined the type.
    pub module: Option<Arc<str>>,

    /// Enclosing type for nested types. Always a definition, never a
    /// constructed type, even when `self` is constructed.
    pub declaring: Option<TypeId>,

    /// Total number of generic parameters, inherited ones included.
    pub generic_arity: u16,

    /// One constraint per generic parameter (`generic_arity` entries).
    pub constraints: SmallVec<[GenericConstraint; 4]>,

    /// Generic arguments of a constructed type, in declaration order.
    pub generic_args: TypeList,

    /// Generic definition this type was constructed from.
    pub definition: Option<TypeId>,

    pub flags: TypeFlags,
}

impl TypeDescriptor {
    /// Simple name with the arity suffix stripped (`Box`1` -> `Box`).
    pub fn simple_name(&self) -> &str {
        match self.metadata_name.find(ARITY_MARKER) {
            Some(index) => &self.metadata_name[..index],
            None => &self.metadata_name,
        }
    }

    /// Namespace-qualified metadata name of this level only (`Shop.Box`1`).
    pub fn metadata_full_name(&self) -> String {
        match &self.namespace {
            Some(ns) if self.declaring.is_none() => format!("{ns}.{}", self.metadata_name),
            _ => self.metadata_name.to_string(),
        }
    }

    pub fn is_generic_type(&self) -> bool {
        self.generic_arity > 0
    }

    /// Generic type with no arguments bound yet.
    pub fn is_generic_definition(&self) -> bool {
        self.generic_arity > 0 && self.generic_args.is_empty()
    }

    /// Type produced by closing a generic definition.
    pub fn is_constructed(&self) -> bool {
        self.definition.is_some()
    }

    pub fn is_nested(&self) -> bool {
        self.declaring.is_some()
    }

    pub fn is_public(&self) -> bool {
        self.flags.contains(TypeFlags::PUBLIC)
    }

    pub fn is_value_type(&self) -> bool {
        self.flags.contains(TypeFlags::VALUE_TYPE)
    }

    pub fn is_primitive(&self) -> bool {
        self.flags.contains(TypeFlags::PRIMITIVE)
    }

    /// The generic definition for constructed types, the type itself otherwise.
    pub fn definition_id(&self) -> TypeId {
        self.definition.unwrap_or(self.id)
    }
}
