//! Runtime type model for the tyres name resolver.
//!
//! This crate provides the "loaded types" side of resolution:
//! - Type handles and descriptors (`TypeId`, `TypeDescriptor`, `TypeFlags`)
//! - A thread-safe store that defines types and closes generic definitions
//!   (`TypeStore`, `TypeDef`)
//! - Builtin primitives and their keyword aliases
//! - Modules: units of exported types and the loaders that enumerate them

// Type handles and descriptors
pub mod descriptor;
pub use descriptor::{
    ARITY_MARKER, GenericConstraint, TypeDescriptor, TypeFlags, TypeId, TypeList,
};

// Definition storage and generic construction
pub mod store;
pub use store::{TypeDef, TypeStore};

// Seeded builtin types
pub mod primitives;
pub use primitives::{BUILTIN_MODULE, KeywordAlias};

// Modules and module loading
pub mod module;
pub use module::{
    ExportedTypes, ModuleBuilder, ModuleLoader, ModuleRegistry, StaticModule, TypeModule,
};

pub mod error;
pub use error::{ConstructionError, ScanError};
