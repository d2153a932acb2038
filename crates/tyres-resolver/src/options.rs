//! Resolver options.
//!
//! Options are an immutable snapshot once handed to a resolver. `configure`
//! builds a new snapshot from defaults (or from a caller supplied base) and
//! swaps it in; after the catalog has been built no further swap is allowed.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tyres_format::{NamingStrategy, TypeNameFormatter};
use tyres_types::TypeDescriptor;

/// Predicate over module names.
pub type ModulePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate over exported types; `true` excludes the type from the catalog.
pub type TypePredicate = Arc<dyn Fn(&TypeDescriptor) -> bool + Send + Sync>;

/// Replaces the loader's module list.
pub type ModuleNamesSource = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// Default file pattern for the probe directory.
pub const DEFAULT_PROBE_PATTERN: &str = "*.dll";

#[derive(Clone)]
pub struct ResolverOptions {
    /// Primary naming strategy.
    pub formatter: Arc<dyn TypeNameFormatter>,

    /// A module is scanned when `module_include(name) || !module_exclude(name)`.
    pub module_include: ModulePredicate,
    pub module_exclude: ModulePredicate,

    pub type_exclude: TypePredicate,

    /// Fail catalog construction when two types share their unique name
    /// instead of dropping both.
    pub fail_on_name_conflicts: bool,

    pub module_names_resolver: Option<ModuleNamesSource>,

    /// Modules scanned regardless of the predicates.
    pub additional_modules: Vec<String>,

    /// Directory probed for module files (file stem = module name).
    pub probe_directory: Option<PathBuf>,
    pub probe_pattern: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            formatter: NamingStrategy::Short.formatter(),
            module_include: Arc::new(|_| false),
            module_exclude: Arc::new(|_| false),
            type_exclude: Arc::new(|_| false),
            fail_on_name_conflicts: false,
            module_names_resolver: None,
            additional_modules: Vec::new(),
            probe_directory: None,
            probe_pattern: DEFAULT_PROBE_PATTERN.to_string(),
        }
    }
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn naming_strategy(&mut self, strategy: NamingStrategy) -> &mut Self {
        self.formatter = strategy.formatter();
        self
    }

    pub fn formatter(&mut self, formatter: Arc<dyn TypeNameFormatter>) -> &mut Self {
        self.formatter = formatter;
        self
    }

    pub fn include_modules(
        &mut self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.module_include = Arc::new(predicate);
        self
    }

    pub fn exclude_modules(
        &mut self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.module_exclude = Arc::new(predicate);
        self
    }

    pub fn exclude_types(
        &mut self,
        predicate: impl Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.type_exclude = Arc::new(predicate);
        self
    }

    pub fn fail_on_name_conflicts(&mut self, fail: bool) -> &mut Self {
        self.fail_on_name_conflicts = fail;
        self
    }

    pub fn module_names(
        &mut self,
        source: impl Fn() -> Vec<String> + Send + Sync + 'static,
    ) -> &mut Self {
        self.module_names_resolver = Some(Arc::new(source));
        self
    }

    pub fn add_module(&mut self, name: impl Into<String>) -> &mut Self {
        self.additional_modules.push(name.into());
        self
    }

    pub fn probe_directory(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.probe_directory = Some(dir.into());
        self
    }

    pub fn probe_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.probe_pattern = pattern.into();
        self
    }

    /// Whether the predicates admit module `name`.
    pub fn admits_module(&self, name: &str) -> bool {
        (self.module_include)(name) || !(self.module_exclude)(name)
    }

    pub fn excludes_type(&self, ty: &TypeDescriptor) -> bool {
        (self.type_exclude)(ty)
    }
}

impl fmt::Debug for ResolverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverOptions")
            .field("formatter", &self.formatter.label())
            .field("fail_on_name_conflicts", &self.fail_on_name_conflicts)
            .field("custom_module_names", &self.module_names_resolver.is_some())
            .field("additional_modules", &self.additional_modules)
            .field("probe_directory", &self.probe_directory)
            .field("probe_pattern", &self.probe_pattern)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
