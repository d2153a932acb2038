//! Errors raised by the runtime type model.

use crate::descriptor::{GenericConstraint, TypeId};
use thiserror::Error;

/// Failure to define a type or to close a generic definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// The handle does not belong to the store.
    #[error("unknown type {0}")]
    UnknownType(TypeId),

    #[error("type '{name}' is not a generic type definition")]
    NotGenericDefinition { name: String },

    #[error("type '{name}' expects {expected} generic argument(s), got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "argument '{argument}' violates the {constraint:?} constraint of parameter {position} of '{name}'"
    )]
    ConstraintViolation {
        name: String,
        position: usize,
        argument: String,
        constraint: GenericConstraint,
    },

    #[error("type '{name}' declares {count} generic parameters, more than supported")]
    TooManyParameters { name: String, count: usize },

    /// Nested types must be declared inside a definition.
    #[error("cannot nest a type inside constructed type '{name}'")]
    ConstructedDeclaringType { name: String },
}

/// Failure while loading a module or enumerating its exported types.
///
/// Scan errors are recovered by the catalog: the module is skipped and the
/// fault is logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("module '{0}' is not available")]
    ModuleNotFound(String),

    #[error("failed to load module '{module}': {reason}")]
    LoadFailed { module: String, reason: String },

    #[error("failed to enumerate exported types of module '{module}': {reason}")]
    Enumeration { module: String, reason: String },
}

impl ScanError {
    /// Name of the module the fault belongs to.
    pub fn module(&self) -> &str {
        match self {
            ScanError::ModuleNotFound(module) => module,
            ScanError::LoadFailed { module, .. } => module,
            ScanError::Enumeration { module, .. } => module,
        }
    }
}
