//! Builtin types seeded into every store.
//!
//! Primitives live in the `System` namespace under their framework names
//! (`Int32`, `String`, ...) and are additionally reachable through keyword
//! aliases (`int`, `string`, ...), which scenario text uses far more often.
//! A handful of builtin generic collections are seeded as well so that names
//! like `List<int>` resolve without any user module.

use crate::descriptor::{GenericConstraint, TypeFlags, TypeId};
use crate::store::{TypeDef, TypeStore};

/// Name of the module exporting the builtin types.
pub const BUILTIN_MODULE: &str = "System.Runtime";

const SYSTEM: &str = "System";
const COLLECTIONS: &str = "System.Collections.Generic";

/// A keyword alias of a builtin type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeywordAlias {
    pub keyword: &'static str,
    pub ty: TypeId,
}

/// (keyword, framework name, is value type)
const ALIASED: &[(&str, &str, bool)] = &[
    ("bool", "Boolean", true),
    ("byte", "Byte", true),
    ("sbyte", "SByte", true),
    ("short", "Int16", true),
    ("ushort", "UInt16", true),
    ("int", "Int32", true),
    ("uint", "UInt32", true),
    ("long", "Int64", true),
    ("ulong", "UInt64", true),
    ("float", "Single", true),
    ("double", "Double", true),
    ("decimal", "Decimal", true),
    ("char", "Char", true),
    ("string", "String", false),
    ("object", "Object", false),
];

const UNALIASED_VALUE_TYPES: &[&str] = &["Guid", "DateTime", "DateTimeOffset", "TimeSpan"];

fn builtin(def: TypeDef, namespace: &str) -> TypeDef {
    def.in_namespace(namespace).in_module(BUILTIN_MODULE)
}

/// Define the builtin types in `store`.
///
/// Returns the keyword aliases and every defined builtin.
pub(crate) fn seed(store: &TypeStore) -> (Vec<KeywordAlias>, Vec<TypeId>) {
    let mut aliases = Vec::with_capacity(ALIASED.len());
    let mut builtins = Vec::new();

    let mut define = |def: TypeDef| -> Option<TypeId> {
        match store.define(def) {
            Ok(id) => {
                builtins.push(id);
                Some(id)
            }
            Err(err) => {
                tracing::error!(%err, "failed to seed builtin type");
                None
            }
        }
    };

    for &(keyword, name, value_type) in ALIASED {
        let mut def = if value_type {
            TypeDef::structure(name)
        } else {
            TypeDef::class(name)
        };
        def.flags |= TypeFlags::PRIMITIVE;
        if let Some(ty) = define(builtin(def, SYSTEM)) {
            aliases.push(KeywordAlias { keyword, ty });
        }
    }

    for &name in UNALIASED_VALUE_TYPES {
        define(builtin(TypeDef::structure(name), SYSTEM));
    }

    define(builtin(
        TypeDef::structure("Nullable").with_constraints(vec![GenericConstraint::ValueType]),
        SYSTEM,
    ));
    define(builtin(TypeDef::class("List").generic(1), COLLECTIONS));
    define(builtin(TypeDef::class("Dictionary").generic(2), COLLECTIONS));
    define(builtin(TypeDef::class("HashSet").generic(1), COLLECTIONS));

    (aliases, builtins)
}
