//! Process-wide resolver.
//!
//! Scenario glue code resolves names from many places without threading a
//! resolver through every step, so one store, one module registry and one
//! resolver live for the whole process:
//!
//! | Item | Lifetime |
//! |------|----------|
//! | [`store`] | Process; builtins seeded on first access |
//! | [`modules`] | Process; pre-populated with the builtin module |
//! | resolver | Process; options frozen once the catalog is built |
//!
//! Register modules and call [`configure`] before the first resolution that
//! reaches the catalog. Later configuration fails with
//! [`ResolverError::AlreadyRealized`].

use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};
use tyres_format::{NamingStrategy, TypeNameFormatter};
use tyres_resolver::{
    AdditionalTypes, ResolverError, ResolverOptions, ResolverSettings, TypeMapping, TypeResolver,
};
use tyres_types::{ModuleLoader, ModuleRegistry, TypeId, TypeStore};

static STORE: Lazy<Arc<TypeStore>> = Lazy::new(|| Arc::new(TypeStore::new()));

static MODULES: Lazy<Arc<ModuleRegistry>> =
    Lazy::new(|| Arc::new(ModuleRegistry::with_builtins(&STORE)));

static RESOLVER: Lazy<RwLock<Arc<TypeResolver>>> =
    Lazy::new(|| RwLock::new(Arc::new(fresh_resolver())));

fn fresh_resolver() -> TypeResolver {
    let loader: Arc<dyn ModuleLoader> = Arc::<ModuleRegistry>::clone(&MODULES);
    TypeResolver::new(Arc::clone(&STORE), loader)
}

fn resolver() -> Arc<TypeResolver> {
    Arc::clone(&RESOLVER.read().unwrap_or_else(|e| e.into_inner()))
}

/// The process-wide type store.
pub fn store() -> &'static Arc<TypeStore> {
    &STORE
}

/// The process-wide module registry scanned by the catalog.
pub fn modules() -> &'static Arc<ModuleRegistry> {
    &MODULES
}

/// Whether the process-wide catalog has been built.
pub fn is_realized() -> bool {
    resolver().is_realized()
}

/// Replace the options with defaults modified by `configure`.
pub fn configure(configure: impl FnOnce(&mut ResolverOptions)) -> Result<(), ResolverError> {
    resolver().configure(configure)
}

/// Replace the options with `base` modified by `configure`.
pub fn configure_with(
    base: ResolverOptions,
    configure: impl FnOnce(&mut ResolverOptions),
) -> Result<(), ResolverError> {
    resolver().configure_with(base, configure)
}

/// Replace the options with ones compiled from `settings`.
pub fn configure_from_settings(settings: &ResolverSettings) -> Result<(), ResolverError> {
    resolver().configure_from_settings(settings)
}

/// Register `types` as user-defined overrides; existing keys are kept.
pub fn map_types(
    types: &[TypeId],
    formatter: Option<&dyn TypeNameFormatter>,
) -> Result<(), ResolverError> {
    resolver().map_types(types, formatter)
}

/// Resolve a free-text type name.
pub fn resolve(name: &str) -> Result<Option<TypeId>, ResolverError> {
    resolver().resolve(name)
}

/// Resolve a name, consulting `additional` for this call only.
pub fn resolve_with(
    name: &str,
    additional: AdditionalTypes<'_>,
) -> Result<Option<TypeId>, ResolverError> {
    resolver().resolve_with(name, additional)
}

/// Resolve a namespace-qualified name against the full-name index.
pub fn resolve_by_full_name(name: &str) -> Result<Option<TypeId>, ResolverError> {
    resolver().resolve_by_full_name(name)
}

/// Full-name resolution with an extra per-call mapping.
pub fn resolve_by_full_name_with(
    name: &str,
    additional: Option<&TypeMapping>,
) -> Result<Option<TypeId>, ResolverError> {
    resolver().resolve_by_full_name_with(name, additional)
}

/// Format `id` with the given naming strategy.
pub fn display_name(id: TypeId, strategy: NamingStrategy) -> String {
    resolver().display_name(id, strategy)
}

/// Replace the resolver with a fresh, unconfigured one.
///
/// The store and the module registry are kept, so previously defined types
/// and registered modules stay valid.
#[cfg(any(test, feature = "test-support"))]
pub fn reset_for_testing() {
    *RESOLVER.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(fresh_resolver());
    tracing::debug!("global resolver reset");
}
