//! Modules and module loading.
//!
//! A module is a named unit of exported types, the counterpart of a loaded
//! library. The resolver never defines types itself: it asks a
//! [`ModuleLoader`] for module names, loads each module and enumerates its
//! exported types. Both steps are fallible so that one broken module can be
//! skipped without failing the whole scan.

use crate::descriptor::TypeId;
use crate::error::{ConstructionError, ScanError};
use crate::store::{TypeDef, TypeStore};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Iterator over a module's exported types. An `Err` item aborts the
/// enumeration of that module.
pub type ExportedTypes<'a> = Box<dyn Iterator<Item = Result<TypeId, ScanError>> + Send + 'a>;

/// A named unit of exported types.
pub trait TypeModule: Send + Sync {
    fn name(&self) -> &str;

    /// Enumerate publicly visible types.
    fn exported_types(&self) -> Result<ExportedTypes<'_>, ScanError>;
}

/// Source of modules for a catalog scan.
pub trait ModuleLoader: Send + Sync {
    /// Names of every module this loader can offer.
    fn module_names(&self) -> Vec<String>;

    fn load(&self, name: &str) -> Result<Arc<dyn TypeModule>, ScanError>;
}

// =============================================================================
// StaticModule
// =============================================================================

/// Module with a fixed list of exported types.
#[derive(Clone, Debug)]
pub struct StaticModule {
    name: String,
    exported: Vec<TypeId>,
}

impl StaticModule {
    pub fn new(name: impl Into<String>, exported: Vec<TypeId>) -> Self {
        Self {
            name: name.into(),
            exported,
        }
    }

    pub fn exported(&self) -> &[TypeId] {
        &self.exported
    }
}

impl TypeModule for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn exported_types(&self) -> Result<ExportedTypes<'_>, ScanError> {
        Ok(Box::new(self.exported.iter().copied().map(Ok)))
    }
}

/// Builds a [`StaticModule`] while defining its types in a store.
///
/// ```
/// use tyres_types::{ModuleBuilder, TypeDef, TypeModule, TypeStore};
///
/// let store = TypeStore::new();
/// let mut builder = ModuleBuilder::new(&store, "Shop.Contracts").namespace("Shop");
/// let order = builder.define(TypeDef::class("Order")).unwrap();
/// builder.define(TypeDef::class("Secret").internal()).unwrap();
///
/// let module = builder.build();
/// assert_eq!(module.name(), "Shop.Contracts");
/// assert_eq!(module.exported(), &[order]);
/// ```
pub struct ModuleBuilder<'s> {
    store: &'s TypeStore,
    name: String,
    namespace: Option<String>,
    exported: Vec<TypeId>,
}

impl<'s> ModuleBuilder<'s> {
    pub fn new(store: &'s TypeStore, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            namespace: None,
            exported: Vec::new(),
        }
    }

    /// Default namespace for top-level types defined through this builder.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Define a type owned by this module.
    ///
    /// The type is exported when it and every enclosing type are public.
    pub fn define(&mut self, mut def: TypeDef) -> Result<TypeId, ConstructionError> {
        if def.declaring.is_none() && def.namespace.is_none() {
            def.namespace = self.namespace.clone();
        }
        def.module = Some(self.name.clone());

        let visible = def.is_public()
            && def.declaring.is_none_or(|parent| self.is_visible(parent));
        let id = self.store.define(def)?;
        if visible {
            self.exported.push(id);
        }
        Ok(id)
    }

    fn is_visible(&self, id: TypeId) -> bool {
        self.store
            .declaring_chain(id)
            .iter()
            .all(|&ty| self.store.get(ty).is_some_and(|d| d.is_public()))
    }

    pub fn build(self) -> StaticModule {
        debug!(module = %self.name, exported = self.exported.len(), "module built");
        StaticModule::new(self.name, self.exported)
    }
}

// =============================================================================
// ModuleRegistry
// =============================================================================

/// In-process module loader.
///
/// Modules are offered in registration order.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: RwLock<IndexMap<String, Arc<dyn TypeModule>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `store`'s builtin module.
    pub fn with_builtins(store: &TypeStore) -> Self {
        let registry = Self::new();
        registry.register(store.builtin_module());
        registry
    }

    /// Register a module. Returns `false` if the name is already taken, in
    /// which case the existing module is kept.
    pub fn register(&self, module: impl TypeModule + 'static) -> bool {
        self.register_shared(Arc::new(module))
    }

    pub fn register_shared(&self, module: Arc<dyn TypeModule>) -> bool {
        let mut modules = self.modules.write().unwrap_or_else(|e| e.into_inner());
        let name = module.name().to_string();
        if modules.contains_key(&name) {
            debug!(module = %name, "module already registered");
            return false;
        }
        modules.insert(name, module);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModuleLoader for ModuleRegistry {
    fn module_names(&self) -> Vec<String> {
        self.modules
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    fn load(&self, name: &str) -> Result<Arc<dyn TypeModule>, ScanError> {
        self.modules
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
            .ok_or_else(|| ScanError::ModuleNotFound(name.to_string()))
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.module_names())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/module_tests.rs"]
mod tests;
