//! Composition of formatted names from nesting levels.
//!
//! A type's name is built outermost level first. Every level contributes its
//! strategy name (arity suffix stripped) and, when it declares generic
//! parameters of its own, the slice of generic arguments belonging to it:
//!
//! ```text
//! Outer`1+Inner`1 closed over [Int32, String]
//!   level Outer  -> own args [Int32]
//!   level Inner  -> own args [String]
//!   => Outer<Int32>.Inner<String>
//! ```

use crate::formatter::TypeNameFormatter;
use std::sync::Arc;
use tyres_types::{ARITY_MARKER, TypeDescriptor, TypeId, TypeStore};

/// One nesting level with the generic arguments declared directly on it.
/// `None` marks an open parameter of a generic definition.
pub type LevelArguments = (Arc<TypeDescriptor>, Vec<Option<TypeId>>);

/// Split the generic arguments of `id` over its nesting levels, innermost
/// level first.
///
/// Levels are the generic definitions of the declaring chain; for constructed
/// types the argument list is distributed by each level's own arity.
pub fn nesting_generic_arguments(store: &TypeStore, id: TypeId) -> Vec<LevelArguments> {
    let Some(ty) = store.get(id) else {
        return Vec::new();
    };
    let chain = store.declaring_chain(ty.definition_id());
    let mut levels = Vec::with_capacity(chain.len());

    for &level_id in &chain {
        let Some(level) = store.get(level_id) else {
            continue;
        };
        let end = usize::from(level.generic_arity);
        let own = store.own_generic_arity(level_id);
        let start = end.checked_sub(own).unwrap_or_default();

        let arguments = if ty.is_constructed() {
            ty.generic_args
                .get(start..end)
                .map(|args| args.iter().copied().map(Some).collect())
                .unwrap_or_default()
        } else {
            vec![None; own]
        };
        levels.push((level, arguments));
    }
    levels
}

/// Format `id` with `formatter`, recursing into generic arguments.
///
/// Unknown handles format as their `Display` form (`#42`).
pub fn format_type_name<F>(formatter: &F, store: &TypeStore, id: TypeId) -> String
where
    F: TypeNameFormatter + ?Sized,
{
    let levels = nesting_generic_arguments(store, id);
    if levels.is_empty() {
        return id.to_string();
    }

    let mut out = String::new();
    for (index, (level, arguments)) in levels.iter().rev().enumerate() {
        if index > 0 {
            out.push(formatter.nested_name_splitter());
        }
        let name = formatter.level_name(level);
        let name = name.split(ARITY_MARKER).next().unwrap_or_default();
        out.push_str(name);

        if !arguments.is_empty() {
            let rendered: Vec<Option<String>> = arguments
                .iter()
                .map(|arg| arg.map(|arg| format_type_name(formatter, store, arg)))
                .collect();
            formatter.format_generic_args(&mut out, &rendered);
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/compose_tests.rs"]
mod tests;
