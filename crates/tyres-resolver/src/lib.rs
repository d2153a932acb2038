//! Type catalog and free-text type name resolution.
//!
//! | Module | Role |
//! |--------|------|
//! | `options` / `settings` | Resolver configuration, programmatic and JSON |
//! | `scan` | Module discovery and exported-type enumeration |
//! | `catalog` | Name -> type indices with collision handling |
//! | `resolver` | `TypeResolver`: parse, look up, close generics, find nested types |
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use tyres_resolver::TypeResolver;
//! use tyres_types::{ModuleRegistry, TypeStore};
//!
//! let store = Arc::new(TypeStore::new());
//! let modules = Arc::new(ModuleRegistry::with_builtins(&store));
//! let resolver = TypeResolver::new(Arc::clone(&store), modules);
//!
//! let list = resolver.resolve("List<int>").unwrap().expect("builtin list");
//! assert_eq!(
//!     resolver.display_name(list, tyres_format::NamingStrategy::Short),
//!     "List<Int32>"
//! );
//! ```

pub mod catalog;
pub use catalog::{TypeCatalog, TypeMapping, create_mapping};

pub mod error;
pub use error::{ConfigError, ResolverError};

pub mod options;
pub use options::{
    DEFAULT_PROBE_PATTERN, ModuleNamesSource, ModulePredicate, ResolverOptions, TypePredicate,
};

pub mod resolver;
pub use resolver::{AdditionalTypes, TypeResolver};

pub mod scan;

pub mod settings;
pub use settings::ResolverSettings;
