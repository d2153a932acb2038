//! Naming strategies.
//!
//! | Strategy | Definition key | Constructed display |
//! |----------|----------------|---------------------|
//! | Short | `Outer<>.Inner<>` | `Outer<Int32>.Inner<String>` |
//! | Full  | `Shop.Outer<>.Inner<>` | `Shop.Outer<System.Int32>.Inner<System.String>` |
//!
//! Only the outermost level carries the namespace under the full strategy,
//! so nested names never repeat it.

use crate::compose;
use crate::error::NameParseError;
use crate::hierarchy::{self, NameNode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tyres_types::{TypeDescriptor, TypeId, TypeStore};

/// A rule for turning type descriptors into names and names into lookup keys.
pub trait TypeNameFormatter: Send + Sync + fmt::Debug {
    /// Short label used in logs.
    fn label(&self) -> &str;

    /// Name of a single nesting level, arity suffix included
    /// (`Box`1`, `Shop.Box`1`). The suffix is stripped by the composer.
    fn level_name(&self, ty: &TypeDescriptor) -> String;

    fn nested_name_splitter(&self) -> char {
        '.'
    }

    /// Disambiguated name used when two types format to the same name.
    fn unique_type_name(&self, store: &TypeStore, id: TypeId) -> String {
        compose::format_type_name(&FullNameFormatter, store, id)
    }

    /// Append `<a1,a2,...>` to `out`. `None` entries are open generic
    /// parameters and render empty.
    ///
    /// # Panics
    ///
    /// Panics if `args` is empty; an empty argument list has no rendering.
    fn format_generic_args(&self, out: &mut String, args: &[Option<String>]) {
        assert!(!args.is_empty(), "generic argument list must not be empty");
        out.push('<');
        for (index, arg) in args.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            if let Some(arg) = arg {
                out.push_str(arg);
            }
        }
        out.push('>');
    }

    /// Formatted name of a loaded type: the key for definitions, the display
    /// name for constructed types.
    fn format_type_name(&self, store: &TypeStore, id: TypeId) -> String {
        compose::format_type_name(self, store, id)
    }

    fn parse_hierarchy(&self, text: &str) -> Result<NameNode, NameParseError> {
        hierarchy::parse_hierarchy_with(text, self.nested_name_splitter())
    }

    /// Arity-erased lookup key of a parsed name (`Box<int>` -> `Box<>`).
    ///
    /// The nested part is kept only when every generic argument is an open
    /// placeholder (`Outer<>.Nested`); otherwise the nested name is resolved
    /// separately against the closed outer type.
    fn lookup_key(&self, node: &NameNode) -> String {
        let mut key = node.name.clone();
        if node.generics.is_empty() {
            return key;
        }
        key.push('<');
        for _ in 1..node.generics.len() {
            key.push(',');
        }
        key.push('>');
        if let Some(nested) = &node.nested
            && node.is_open()
        {
            key.push(self.nested_name_splitter());
            key.push_str(&self.lookup_key(nested));
        }
        key
    }
}

/// Formats every level by its simple name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShortNameFormatter;

impl TypeNameFormatter for ShortNameFormatter {
    fn label(&self) -> &str {
        "short"
    }

    fn level_name(&self, ty: &TypeDescriptor) -> String {
        ty.metadata_name.to_string()
    }
}

/// Formats the outermost level with its namespace, nested levels by simple name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FullNameFormatter;

impl TypeNameFormatter for FullNameFormatter {
    fn label(&self) -> &str {
        "full"
    }

    fn level_name(&self, ty: &TypeDescriptor) -> String {
        ty.metadata_full_name()
    }
}

/// Builtin naming strategy selector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    #[default]
    Short,
    Full,
}

impl NamingStrategy {
    pub fn formatter(self) -> Arc<dyn TypeNameFormatter> {
        match self {
            NamingStrategy::Short => Arc::new(ShortNameFormatter),
            NamingStrategy::Full => Arc::new(FullNameFormatter),
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingStrategy::Short => f.write_str("short"),
            NamingStrategy::Full => f.write_str("full"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/formatter_tests.rs"]
mod tests;
