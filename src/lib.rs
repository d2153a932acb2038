//! Free-text type name resolution for behaviour-driven test scenarios.
//!
//! Scenario text names types the way people write them (`Order`,
//! `Box<int>`, `Outer<int>.Inner<string>`); `tyres` maps those names back
//! onto loaded types.
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `tyres-types` | Type store, generic closing, modules |
//! | `tyres-format` | Naming strategies, name hierarchy parser |
//! | `tyres-resolver` | Catalog, resolver, options and settings |
//! | `tyres` | Process-wide resolver, tracing setup |
//!
//! ## Usage
//!
//! ```
//! use tyres::{ModuleBuilder, NamingStrategy, TypeDef, global};
//!
//! let mut shop = ModuleBuilder::new(global::store(), "Shop.Contracts").namespace("Shop");
//! shop.define(TypeDef::class("Basket").generic(1)).unwrap();
//! global::modules().register(shop.build());
//!
//! let basket = global::resolve("Basket<int>").unwrap().expect("resolved");
//! assert_eq!(global::display_name(basket, NamingStrategy::Full), "Shop.Basket<System.Int32>");
//! ```

pub mod global;
pub mod tracing_config;

pub use tracing_config::init_tracing;

pub use tyres_format::{
    FullNameFormatter, NameNode, NameParseError, NamingStrategy, ShortNameFormatter,
    TypeNameFormatter, parse_hierarchy,
};
pub use tyres_resolver::{
    AdditionalTypes, ConfigError, ResolverError, ResolverOptions, ResolverSettings, TypeCatalog,
    TypeMapping, TypeResolver,
};
pub use tyres_types::{
    ConstructionError, GenericConstraint, ModuleBuilder, ModuleLoader, ModuleRegistry, ScanError,
    StaticModule, TypeDef, TypeDescriptor, TypeFlags, TypeId, TypeModule, TypeStore,
};
