//! Resolver and configuration errors.
//!
//! "Not found" is never an error: lookups return `Ok(None)`. `ResolverError`
//! covers configuration-order violations and strict-mode name conflicts.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tyres_types::TypeId;

#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    /// Options were changed after the catalog had been built.
    #[error("resolver options cannot be changed after the type catalog has been built")]
    AlreadyRealized,

    /// Two distinct types share even their unique names (strict mode only).
    #[error("types {first} and {second} both resolve to '{name}'")]
    NameConflict {
        name: String,
        first: TypeId,
        second: TypeId,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid resolver settings.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("invalid settings JSON: {0}")]
    Json(Arc<serde_json::Error>),

    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(Arc::new(err))
    }
}
