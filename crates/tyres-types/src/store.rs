//! Definition storage and generic construction.
//!
//! `TypeStore` plays the role of the running process' type system: it hands out
//! `TypeId`s for defined types, remembers which types are nested in which, and
//! closes generic definitions over concrete arguments.
//!
//! Constructed types are interned: closing the same definition over the same
//! arguments always yields the same `TypeId`, so handle equality is type
//! equality.
//!
//! ## Usage
//!
//! ```
//! use tyres_types::{TypeDef, TypeStore};
//!
//! let store = TypeStore::new();
//! let boxed = store.define(TypeDef::class("Box").generic(1)).unwrap();
//! let int = store.alias("int").unwrap();
//!
//! let first = store.make_generic(boxed, &[int]).unwrap();
//! let second = store.make_generic(boxed, &[int]).unwrap();
//! assert_eq!(first, second);
//! ```

use crate::descriptor::{ARITY_MARKER, GenericConstraint, TypeDescriptor, TypeFlags, TypeId, TypeList};
use crate::error::ConstructionError;
use crate::module::StaticModule;
use crate::primitives::{self, KeywordAlias};
use dashmap::DashMap;
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning instance IDs to stores (shows up in traces).
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// TypeDef - Definition Request
// =============================================================================

/// Request to define a new type in a [`TypeStore`].
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) module: Option<String>,
    pub(crate) declaring: Option<TypeId>,
    pub(crate) constraints: Vec<GenericConstraint>,
    pub(crate) flags: TypeFlags,
}

impl TypeDef {
    fn with_flags(name: impl Into<String>, flags: TypeFlags) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            module: None,
            declaring: None,
            constraints: Vec::new(),
            flags,
        }
    }

    /// A public reference type.
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_flags(name, TypeFlags::PUBLIC)
    }

    /// A public value type.
    pub fn structure(name: impl Into<String>) -> Self {
        Self::with_flags(name, TypeFlags::PUBLIC | TypeFlags::VALUE_TYPE)
    }

    /// A public interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_flags(name, TypeFlags::PUBLIC | TypeFlags::INTERFACE)
    }

    /// Declare `arity` unconstrained generic parameters directly on this type.
    pub fn generic(mut self, arity: usize) -> Self {
        self.constraints = vec![GenericConstraint::None; arity];
        self
    }

    /// Declare generic parameters with explicit constraints.
    pub fn with_constraints(mut self, constraints: Vec<GenericConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Nest this type inside `declaring`, inheriting its generic parameters.
    pub fn nested_in(mut self, declaring: TypeId) -> Self {
        self.declaring = Some(declaring);
        self
    }

    /// Hide the type from module exports.
    pub fn internal(mut self) -> Self {
        self.flags.remove(TypeFlags::PUBLIC);
        self
    }

    pub fn is_public(&self) -> bool {
        self.flags.contains(TypeFlags::PUBLIC)
    }

    /// Metadata name (`Name` or `Name`N`).
    fn metadata_name(&self) -> String {
        if self.constraints.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.name, ARITY_MARKER, self.constraints.len())
        }
    }
}

// =============================================================================
// TypeStore - Storage for Types
// =============================================================================

/// Thread-safe storage for loaded types.
///
/// Uses `DashMap` so modules can define types and resolvers can construct
/// generics from multiple threads without a global lock.
pub struct TypeStore {
    /// Unique instance ID for debugging
    instance_id: u64,

    /// `TypeId` -> descriptor mapping
    types: DashMap<TypeId, Arc<TypeDescriptor>>,

    /// Declaring definition -> directly nested definitions, in declaration order
    nested: DashMap<TypeId, TypeList>,

    /// (definition, arguments) -> constructed type
    constructed: DashMap<(TypeId, TypeList), TypeId>,

    /// Next available `TypeId`
    next_id: AtomicU32,

    /// Keyword aliases of the seeded primitives (`int` -> `System.Int32`)
    aliases: Vec<KeywordAlias>,

    /// Every seeded builtin type, exported by the builtin module
    builtins: Vec<TypeId>,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    /// Create a store seeded with the builtin primitives.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "TypeStore::new - creating new instance");
        let mut store = Self {
            instance_id,
            types: DashMap::new(),
            nested: DashMap::new(),
            constructed: DashMap::new(),
            next_id: AtomicU32::new(TypeId::FIRST_VALID),
            aliases: Vec::new(),
            builtins: Vec::new(),
        };
        let (aliases, builtins) = primitives::seed(&store);
        store.aliases = aliases;
        store.builtins = builtins;
        store
    }

    fn allocate(&self) -> TypeId {
        TypeId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn insert(&self, descriptor: TypeDescriptor) -> TypeId {
        let id = descriptor.id;
        trace!(
            instance_id = self.instance_id,
            type_id = %id,
            name = %descriptor.metadata_name,
            "TypeStore::insert"
        );
        self.types.insert(id, Arc::new(descriptor));
        id
    }

    /// Define a new type.
    ///
    /// Nested types inherit namespace, module and generic parameters of their
    /// declaring type unless given explicitly.
    pub fn define(&self, def: TypeDef) -> Result<TypeId, ConstructionError> {
        let declaring = match def.declaring {
            Some(id) => {
                let parent = self.get(id).ok_or(ConstructionError::UnknownType(id))?;
                if parent.is_constructed() {
                    return Err(ConstructionError::ConstructedDeclaringType {
                        name: parent.metadata_full_name(),
                    });
                }
                Some(parent)
            }
            None => None,
        };

        let mut constraints: SmallVec<[GenericConstraint; 4]> = declaring
            .as_ref()
            .map(|parent| parent.constraints.clone())
            .unwrap_or_default();
        constraints.extend(def.constraints.iter().copied());

        let namespace = def
            .namespace
            .as_deref()
            .map(Arc::from)
            .or_else(|| declaring.as_ref().and_then(|p| p.namespace.clone()));
        let module = def
            .module
            .as_deref()
            .map(Arc::from)
            .or_else(|| declaring.as_ref().and_then(|p| p.module.clone()));

        let generic_arity =
            u16::try_from(constraints.len()).map_err(|_| ConstructionError::TooManyParameters {
                name: def.name.clone(),
                count: constraints.len(),
            })?;

        let id = self.allocate();
        let descriptor = TypeDescriptor {
            id,
            metadata_name: Arc::from(def.metadata_name()),
            namespace,
            module,
            declaring: def.declaring,
            generic_arity,
            constraints,
            generic_args: TypeList::new(),
            definition: None,
            flags: def.flags,
        };
        self.insert(descriptor);

        if let Some(parent) = def.declaring {
            self.nested.entry(parent).or_default().push(id);
        }
        Ok(id)
    }

    /// Get a descriptor by `TypeId`.
    pub fn get(&self, id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.types.get(&id).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.types.contains_key(&id)
    }

    /// Number of stored types, constructed ones included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Number of generic parameters declared directly on `id`, excluding the
    /// ones inherited from its declaring type.
    pub fn own_generic_arity(&self, id: TypeId) -> usize {
        let Some(descriptor) = self.get(id) else {
            return 0;
        };
        let inherited = descriptor
            .declaring
            .and_then(|parent| self.get(parent))
            .map_or(0, |parent| parent.generic_arity);
        usize::from(descriptor.generic_arity.saturating_sub(inherited))
    }

    /// Definitions declared directly inside `id` (or inside its generic
    /// definition when `id` is constructed), in declaration order.
    pub fn nested_types(&self, id: TypeId) -> TypeList {
        let definition = self.get(id).map_or(id, |d| d.definition_id());
        self.nested
            .get(&definition)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    /// The chain `[id, declaring, declaring of declaring, ...]`.
    pub fn declaring_chain(&self, id: TypeId) -> TypeList {
        let mut chain = TypeList::new();
        let mut current = Some(id);
        while let Some(ty) = current {
            chain.push(ty);
            current = self.get(ty).and_then(|d| d.declaring);
        }
        chain
    }

    /// Close a generic definition over concrete arguments.
    ///
    /// `arguments` must cover every generic parameter, inherited ones first.
    pub fn make_generic(
        &self,
        definition: TypeId,
        arguments: &[TypeId],
    ) -> Result<TypeId, ConstructionError> {
        let def = self
            .get(definition)
            .ok_or(ConstructionError::UnknownType(definition))?;
        if !def.is_generic_definition() {
            return Err(ConstructionError::NotGenericDefinition {
                name: def.metadata_full_name(),
            });
        }
        if arguments.len() != usize::from(def.generic_arity) {
            return Err(ConstructionError::ArityMismatch {
                name: def.metadata_full_name(),
                expected: usize::from(def.generic_arity),
                actual: arguments.len(),
            });
        }
        for (position, (&argument, constraint)) in
            arguments.iter().zip(def.constraints.iter()).enumerate()
        {
            let arg = self
                .get(argument)
                .ok_or(ConstructionError::UnknownType(argument))?;
            if !constraint.admits(&arg) {
                return Err(ConstructionError::ConstraintViolation {
                    name: def.metadata_full_name(),
                    position,
                    argument: arg.metadata_full_name(),
                    constraint: *constraint,
                });
            }
        }

        let key = (definition, TypeList::from_slice(arguments));
        let id = *self.constructed.entry(key).or_insert_with(|| {
            let id = self.allocate();
            self.insert(TypeDescriptor {
                id,
                metadata_name: def.metadata_name.clone(),
                namespace: def.namespace.clone(),
                module: def.module.clone(),
                declaring: def.declaring,
                generic_arity: def.generic_arity,
                constraints: def.constraints.clone(),
                generic_args: TypeList::from_slice(arguments),
                definition: Some(definition),
                flags: def.flags,
            })
        });
        Ok(id)
    }

    /// Look up a seeded primitive by keyword alias (`int`, `string`, ...).
    pub fn alias(&self, keyword: &str) -> Option<TypeId> {
        self.aliases
            .iter()
            .find(|alias| alias.keyword == keyword)
            .map(|alias| alias.ty)
    }

    pub fn keyword_aliases(&self) -> &[KeywordAlias] {
        &self.aliases
    }

    /// The module exporting every seeded builtin type.
    pub fn builtin_module(&self) -> StaticModule {
        StaticModule::new(primitives::BUILTIN_MODULE, self.builtins.clone())
    }
}

impl std::fmt::Debug for TypeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeStore")
            .field("instance_id", &self.instance_id)
            .field("types", &self.types.len())
            .field("constructed", &self.constructed.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
