//! Name -> type index.
//!
//! A catalog is built from one module scan and holds two indices over the
//! same type set: one keyed by the primary naming strategy and one keyed by
//! the full strategy. Keys are arity-erased definition names (`Box<>`,
//! `Outer<>.Inner<>`), so lookups select by generic arity only.
//!
//! ## Name collisions
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Two types share a key | Both move to their unique (full) name |
//! | A later type hits an already collided key | It goes straight to its unique name |
//! | Unique names collide too, lenient mode | Both dropped, logged at `warn` |
//! | Unique names collide too, strict mode | `ResolverError::NameConflict` |
//! | The same type is added twice | No-op |

use crate::error::ResolverError;
use crate::options::ResolverOptions;
use crate::scan;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};
use tyres_format::{FullNameFormatter, TypeNameFormatter};
use tyres_types::{ModuleLoader, TypeId, TypeStore};

/// Formatted name -> type.
pub type TypeMapping = FxHashMap<String, TypeId>;

#[derive(Clone, Debug, Default)]
pub struct TypeCatalog {
    primary: TypeMapping,
    full: TypeMapping,
    scanned: usize,
}

impl TypeCatalog {
    /// Scan the modules offered by `loader` and index their exported types.
    #[tracing::instrument(level = "debug", skip_all, fields(formatter = options.formatter.label()))]
    pub fn build(
        store: &TypeStore,
        loader: &dyn ModuleLoader,
        options: &ResolverOptions,
    ) -> Result<Self, ResolverError> {
        let names = scan::module_names(loader, options);
        debug!(modules = ?names, "scanning modules");
        let types = scan::scan_types(store, loader, &names, options);
        Self::from_types(
            store,
            &types,
            options.formatter.as_ref(),
            options.fail_on_name_conflicts,
        )
    }

    /// Index an explicit type list.
    pub fn from_types(
        store: &TypeStore,
        types: &[TypeId],
        formatter: &dyn TypeNameFormatter,
        fail_on_conflicts: bool,
    ) -> Result<Self, ResolverError> {
        let primary = create_mapping(store, types, formatter, fail_on_conflicts)?;
        let full = create_mapping(store, types, &FullNameFormatter, fail_on_conflicts)?;
        info!(
            types = types.len(),
            primary = primary.len(),
            full = full.len(),
            "type catalog built"
        );
        Ok(Self {
            primary,
            full,
            scanned: types.len(),
        })
    }

    /// Look up a key in the primary index.
    pub fn get(&self, key: &str) -> Option<TypeId> {
        self.primary.get(key).copied()
    }

    /// Look up a key in the full-name index.
    pub fn get_full(&self, key: &str) -> Option<TypeId> {
        self.full.get(key).copied()
    }

    pub fn primary(&self) -> &TypeMapping {
        &self.primary
    }

    pub fn full(&self) -> &TypeMapping {
        &self.full
    }

    /// Number of types the catalog was built from.
    pub fn scanned_types(&self) -> usize {
        self.scanned
    }
}

/// Build a mapping of `types` keyed by `formatter`, applying the collision
/// policy described in the module docs.
pub fn create_mapping(
    store: &TypeStore,
    types: &[TypeId],
    formatter: &dyn TypeNameFormatter,
    fail_on_conflicts: bool,
) -> Result<TypeMapping, ResolverError> {
    let mut builder = MappingBuilder {
        store,
        formatter,
        fail_on_conflicts,
        mapping: TypeMapping::default(),
        collided: FxHashSet::default(),
        dropped: FxHashSet::default(),
    };
    for &id in types {
        builder.add(id)?;
    }
    Ok(builder.mapping)
}

struct MappingBuilder<'a> {
    store: &'a TypeStore,
    formatter: &'a dyn TypeNameFormatter,
    fail_on_conflicts: bool,
    mapping: TypeMapping,
    /// Keys shared by more than one type.
    collided: FxHashSet<String>,
    /// Unique keys shared by more than one type (lenient mode).
    dropped: FxHashSet<String>,
}

impl MappingBuilder<'_> {
    fn add(&mut self, id: TypeId) -> Result<(), ResolverError> {
        let key = self.formatter.format_type_name(self.store, id);
        if self.collided.contains(&key) {
            return self.add_unique(id);
        }

        match self.mapping.get(&key).copied() {
            None => {
                self.mapping.insert(key, id);
                Ok(())
            }
            Some(existing) if existing == id => Ok(()),
            Some(existing) => {
                debug!(
                    name = %key,
                    first = %existing,
                    second = %id,
                    "name collision, falling back to unique names"
                );
                self.mapping.remove(&key);
                self.collided.insert(key);
                self.add_unique(existing)?;
                self.add_unique(id)
            }
        }
    }

    fn add_unique(&mut self, id: TypeId) -> Result<(), ResolverError> {
        let key = self.formatter.unique_type_name(self.store, id);
        if self.dropped.contains(&key) {
            warn!(name = %key, type_id = %id, "dropping type with conflicting unique name");
            return Ok(());
        }

        match self.mapping.get(&key).copied() {
            None => {
                self.mapping.insert(key, id);
                Ok(())
            }
            Some(existing) if existing == id => Ok(()),
            Some(existing) if self.fail_on_conflicts => Err(ResolverError::NameConflict {
                name: key,
                first: existing,
                second: id,
            }),
            Some(existing) => {
                warn!(
                    name = %key,
                    first = %existing,
                    second = %id,
                    "dropping types with conflicting unique names"
                );
                self.mapping.remove(&key);
                self.dropped.insert(key);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/catalog_tests.rs"]
mod tests;
