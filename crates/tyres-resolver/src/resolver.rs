//! Free-text type name resolution.
//!
//! Resolution walks the parsed [`NameNode`] tree:
//!
//! 1. The node's arity-erased lookup key (`Box<>`) is looked up in the
//!    per-call mapping, the user-defined mapping, the keyword aliases and
//!    finally the catalog (primary index, then full index). The catalog is
//!    only built when the first three layers miss.
//! 2. Generic arguments are resolved recursively and the definition is closed
//!    over them. Any unresolved argument fails the whole name.
//! 3. A nested name (`Outer<int>.Inner<string>`) is matched against the
//!    nested definitions of the closed outer type and closed over the outer
//!    arguments followed by its own.
//!
//! "Not found" is `Ok(None)`; `Err` is reserved for configuration-order
//! violations and strict-mode name conflicts.

use crate::catalog::{TypeCatalog, TypeMapping, create_mapping};
use crate::error::ResolverError;
use crate::options::ResolverOptions;
use crate::settings::ResolverSettings;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, trace};
use tyres_format::{FullNameFormatter, NameNode, NamingStrategy, TypeNameFormatter};
use tyres_types::{ModuleLoader, TypeId, TypeList, TypeStore};

/// Types supplied for a single resolution call; never persisted.
#[derive(Clone, Copy, Debug, Default)]
pub enum AdditionalTypes<'a> {
    #[default]
    None,
    /// Precomputed name -> type mapping.
    Mapping(&'a TypeMapping),
    /// Types named with the active formatter.
    Types(&'a [TypeId]),
}

/// Which catalog indices a lookup may consult.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    /// Primary index, then full index.
    Any,
    FullOnly,
}

pub struct TypeResolver {
    store: Arc<TypeStore>,
    loader: Arc<dyn ModuleLoader>,
    options: RwLock<Arc<ResolverOptions>>,
    /// Serializes configuration against catalog realization.
    config_lock: Mutex<()>,
    realized: AtomicBool,
    catalog: OnceCell<Result<TypeCatalog, ResolverError>>,
    /// Additive overrides registered through `map_types`.
    user_defined: DashMap<String, TypeId>,
}

impl TypeResolver {
    pub fn new(store: Arc<TypeStore>, loader: Arc<dyn ModuleLoader>) -> Self {
        Self::with_options(store, loader, ResolverOptions::default())
    }

    pub fn with_options(
        store: Arc<TypeStore>,
        loader: Arc<dyn ModuleLoader>,
        options: ResolverOptions,
    ) -> Self {
        Self {
            store,
            loader,
            options: RwLock::new(Arc::new(options)),
            config_lock: Mutex::new(()),
            realized: AtomicBool::new(false),
            catalog: OnceCell::new(),
            user_defined: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<TypeStore> {
        &self.store
    }

    /// Snapshot of the active options.
    pub fn options(&self) -> Arc<ResolverOptions> {
        Arc::clone(&self.options.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Whether the catalog has been (or is being) built.
    pub fn is_realized(&self) -> bool {
        self.realized.load(Ordering::Acquire)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace the options with defaults modified by `configure`.
    pub fn configure(
        &self,
        configure: impl FnOnce(&mut ResolverOptions),
    ) -> Result<(), ResolverError> {
        self.configure_with(ResolverOptions::default(), configure)
    }

    /// Replace the options with `base` modified by `configure`.
    ///
    /// Fails with [`ResolverError::AlreadyRealized`] once the catalog has
    /// been built, including when `configure` itself realizes it.
    pub fn configure_with(
        &self,
        mut base: ResolverOptions,
        configure: impl FnOnce(&mut ResolverOptions),
    ) -> Result<(), ResolverError> {
        // Runs unlocked: the closure may resolve names and build the catalog.
        configure(&mut base);

        let _guard = self.config_lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.is_realized() {
            return Err(ResolverError::AlreadyRealized);
        }
        debug!(options = ?base, "resolver configured");
        *self.options.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(base);
        Ok(())
    }

    /// Replace the options with ones compiled from `settings`.
    pub fn configure_from_settings(&self, settings: &ResolverSettings) -> Result<(), ResolverError> {
        let options = settings.clone().into_options()?;
        self.configure_with(options, |_| {})
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// The catalog, built on first use.
    ///
    /// Exactly one caller runs the scan; concurrent callers block until it
    /// finishes and observe the same result, including a construction error.
    pub fn catalog(&self) -> Result<&TypeCatalog, ResolverError> {
        self.catalog
            .get_or_init(|| {
                let options = {
                    let _guard = self.config_lock.lock().unwrap_or_else(|e| e.into_inner());
                    self.realized.store(true, Ordering::Release);
                    self.options()
                };
                TypeCatalog::build(&self.store, self.loader.as_ref(), &options)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Register `types` as user-defined overrides, named with `formatter` or
    /// the active one. Existing keys are kept.
    pub fn map_types(
        &self,
        types: &[TypeId],
        formatter: Option<&dyn TypeNameFormatter>,
    ) -> Result<(), ResolverError> {
        let options = self.options();
        let formatter = formatter.unwrap_or(options.formatter.as_ref());
        let mapping = create_mapping(
            &self.store,
            types,
            formatter,
            options.fail_on_name_conflicts,
        )?;
        for (name, id) in mapping {
            self.user_defined.entry(name).or_insert(id);
        }
        debug!(
            types = types.len(),
            user_defined = self.user_defined.len(),
            "types mapped"
        );
        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    pub fn resolve(&self, name: &str) -> Result<Option<TypeId>, ResolverError> {
        self.resolve_with(name, AdditionalTypes::None)
    }

    /// Resolve `name`, consulting `additional` before any other mapping.
    pub fn resolve_with(
        &self,
        name: &str,
        additional: AdditionalTypes<'_>,
    ) -> Result<Option<TypeId>, ResolverError> {
        let options = self.options();
        self.resolve_in_scope(name, additional, options.formatter.as_ref(), Scope::Any)
    }

    /// Resolve a full name against the full-name index only. Generic
    /// arguments are resolved by the regular procedure.
    pub fn resolve_by_full_name(&self, name: &str) -> Result<Option<TypeId>, ResolverError> {
        self.resolve_by_full_name_with(name, None)
    }

    pub fn resolve_by_full_name_with(
        &self,
        name: &str,
        additional: Option<&TypeMapping>,
    ) -> Result<Option<TypeId>, ResolverError> {
        let additional = additional.map_or(AdditionalTypes::None, AdditionalTypes::Mapping);
        self.resolve_in_scope(name, additional, &FullNameFormatter, Scope::FullOnly)
    }

    /// Display name of a loaded type under `strategy` (`Box<Int32>`).
    pub fn display_name(&self, id: TypeId, strategy: NamingStrategy) -> String {
        strategy.formatter().format_type_name(&self.store, id)
    }

    fn resolve_in_scope(
        &self,
        name: &str,
        additional: AdditionalTypes<'_>,
        formatter: &dyn TypeNameFormatter,
        scope: Scope,
    ) -> Result<Option<TypeId>, ResolverError> {
        let node = match formatter.parse_hierarchy(name) {
            Ok(node) => node,
            Err(err) => {
                debug!(name, %err, "unparseable type name");
                return Ok(None);
            }
        };

        let options = self.options();
        let extra = match additional {
            AdditionalTypes::None => None,
            AdditionalTypes::Mapping(mapping) => Some(Cow::Borrowed(mapping)),
            AdditionalTypes::Types(types) => Some(Cow::Owned(create_mapping(
                &self.store,
                types,
                options.formatter.as_ref(),
                options.fail_on_name_conflicts,
            )?)),
        };

        let lookup = Lookup {
            resolver: self,
            formatter,
            extra: extra.as_deref(),
        };
        let resolved = lookup.node(&node, scope)?;
        match resolved {
            Some(id) => trace!(name, type_id = %id, "resolved"),
            None => debug!(name, "type name not resolved"),
        }
        Ok(resolved)
    }
}

impl std::fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeResolver")
            .field("realized", &self.is_realized())
            .field("user_defined", &self.user_defined.len())
            .field("options", &self.options())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Lookup - one resolution call
// =============================================================================

struct Lookup<'r> {
    resolver: &'r TypeResolver,
    formatter: &'r dyn TypeNameFormatter,
    extra: Option<&'r TypeMapping>,
}

impl Lookup<'_> {
    fn store(&self) -> &TypeStore {
        &self.resolver.store
    }

    fn node(&self, node: &NameNode, scope: Scope) -> Result<Option<TypeId>, ResolverError> {
        let key = self.formatter.lookup_key(node);
        let Some(base) = self.find(&key, scope)? else {
            return Ok(None);
        };

        // Open definitions are addressed as a whole, nested part included.
        if node.is_open() {
            if !is_fully_open(node) {
                debug!(key = %key, "partially open generic name");
                return Ok(None);
            }
            return Ok(Some(base));
        }

        let mut args = TypeList::new();
        for generic in &node.generics {
            match self.node(generic, Scope::Any)? {
                Some(arg) => args.push(arg),
                None => return Ok(None),
            }
        }
        let Some(closed) = self.close(base, &args) else {
            return Ok(None);
        };

        match &node.nested {
            Some(nested) => self.nested(closed, nested),
            None => Ok(Some(closed)),
        }
    }

    /// Consult the lookup layers in order.
    fn find(&self, key: &str, scope: Scope) -> Result<Option<TypeId>, ResolverError> {
        if let Some(&id) = self.extra.and_then(|extra| extra.get(key)) {
            trace!(key, type_id = %id, "found in additional mapping");
            return Ok(Some(id));
        }
        if let Some(id) = self.resolver.user_defined.get(key).map(|r| *r.value()) {
            trace!(key, type_id = %id, "found in user-defined mapping");
            return Ok(Some(id));
        }
        if let Some(id) = self.store().alias(key) {
            trace!(key, type_id = %id, "found keyword alias");
            return Ok(Some(id));
        }

        let catalog = self.resolver.catalog()?;
        let found = match scope {
            Scope::Any => catalog.get(key).or_else(|| catalog.get_full(key)),
            Scope::FullOnly => catalog.get_full(key),
        };
        if found.is_none() {
            debug!(key, ?scope, "no type for key");
        }
        Ok(found)
    }

    /// Close `base` over `args`; a type without arguments is returned as is.
    fn close(&self, base: TypeId, args: &[TypeId]) -> Option<TypeId> {
        if args.is_empty() {
            return Some(base);
        }
        match self.store().make_generic(base, args) {
            Ok(closed) => Some(closed),
            Err(err) => {
                debug!(%err, "cannot close generic type");
                None
            }
        }
    }

    /// Find `nested` among the nested definitions of the closed type `outer`.
    fn nested(&self, outer: TypeId, nested: &NameNode) -> Result<Option<TypeId>, ResolverError> {
        if nested.is_open() {
            debug!(nested = %nested, "open nested name under closed outer type");
            return Ok(None);
        }
        let Some(outer_ty) = self.store().get(outer) else {
            return Ok(None);
        };

        let key = self.formatter.lookup_key(nested);
        let splitter = self.formatter.nested_name_splitter();
        let definition = outer_ty.definition_id();
        let Some(candidate) = transitive_nested(self.store(), definition)
            .into_iter()
            .find(|&candidate| relative_key(self.store(), definition, candidate, splitter) == key)
        else {
            debug!(outer = %outer, key = %key, "no nested type matches");
            return Ok(None);
        };

        let mut args = outer_ty.generic_args.clone();
        for generic in &nested.generics {
            match self.node(generic, Scope::Any)? {
                Some(arg) => args.push(arg),
                None => return Ok(None),
            }
        }
        let Some(closed) = self.close(candidate, &args) else {
            return Ok(None);
        };

        match &nested.nested {
            Some(deeper) => self.nested(closed, deeper),
            None => Ok(Some(closed)),
        }
    }
}

/// An open node whose nested chain is open or non-generic at every level.
fn is_fully_open(node: &NameNode) -> bool {
    let mut current = Some(node);
    while let Some(level) = current {
        if !level.generics.is_empty() && !level.is_open() {
            return false;
        }
        current = level.nested.as_deref();
    }
    true
}

/// Every definition nested (at any depth) inside `definition`, pre-order.
fn transitive_nested(store: &TypeStore, definition: TypeId) -> Vec<TypeId> {
    let mut found = Vec::new();
    let mut stack: Vec<TypeId> = store.nested_types(definition).into_iter().rev().collect();
    while let Some(id) = stack.pop() {
        found.push(id);
        stack.extend(store.nested_types(id).into_iter().rev());
    }
    found
}

/// Arity-erased name of `candidate` relative to its ancestor `outer`
/// (`Inner<>`, `Inner<>.Deep`).
fn relative_key(store: &TypeStore, outer: TypeId, candidate: TypeId, splitter: char) -> String {
    let mut levels: Vec<TypeId> = store
        .declaring_chain(candidate)
        .into_iter()
        .take_while(|&level| level != outer)
        .collect();
    levels.reverse();

    let mut key = String::new();
    for (index, level) in levels.into_iter().enumerate() {
        let Some(ty) = store.get(level) else {
            continue;
        };
        if index > 0 {
            key.push(splitter);
        }
        key.push_str(ty.simple_name());
        let own = store.own_generic_arity(level);
        if own > 0 {
            key.push('<');
            key.push_str(&",".repeat(own - 1));
            key.push('>');
        }
    }
    key
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
