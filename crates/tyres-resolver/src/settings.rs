//! JSON resolver settings.
//!
//! The declarative counterpart of [`ResolverOptions`]: predicates become glob
//! pattern lists so settings can live in a file next to the test scenarios.
//!
//! ```json
//! {
//!   "namingStrategy": "full",
//!   "includeModules": ["Shop.Contracts"],
//!   "excludeModules": ["*.Tests", "Vendor.*"],
//!   "excludeTypes": ["*Proxy"],
//!   "failOnNameConflicts": true
//! }
//! ```
//!
//! Type patterns match the namespace-qualified metadata name of the type.

use crate::error::ConfigError;
use crate::options::{DEFAULT_PROBE_PATTERN, ResolverOptions};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tyres_format::NamingStrategy;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ResolverSettings {
    pub naming_strategy: NamingStrategy,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_modules: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_modules: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_types: Vec<String>,

    pub fail_on_name_conflicts: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_modules: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_directory: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_pattern: Option<String>,
}

impl ResolverSettings {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        debug!(path = %path.display(), "loading resolver settings");
        Self::from_json_str(&text)
    }

    /// Compile the settings onto existing options.
    ///
    /// Empty pattern lists leave the corresponding predicate in place.
    pub fn apply(&self, options: &mut ResolverOptions) -> Result<(), ConfigError> {
        options.naming_strategy(self.naming_strategy);
        options.fail_on_name_conflicts(self.fail_on_name_conflicts);

        if let Some(include) = compile_patterns(&self.include_modules)? {
            options.include_modules(move |name| include.is_match(name));
        }
        if let Some(exclude) = compile_patterns(&self.exclude_modules)? {
            options.exclude_modules(move |name| exclude.is_match(name));
        }
        if let Some(types) = compile_patterns(&self.exclude_types)? {
            options.exclude_types(move |ty| types.is_match(ty.metadata_full_name()));
        }

        for module in &self.additional_modules {
            options.add_module(module.clone());
        }
        if let Some(dir) = &self.probe_directory {
            options.probe_directory(dir.clone());
        }
        options.probe_pattern(
            self.probe_pattern
                .clone()
                .unwrap_or_else(|| DEFAULT_PROBE_PATTERN.to_string()),
        );
        Ok(())
    }

    /// Compile the settings into fresh options.
    pub fn into_options(self) -> Result<ResolverOptions, ConfigError> {
        let mut options = ResolverOptions::default();
        self.apply(&mut options)?;
        Ok(options)
    }
}

/// Compile `patterns` into one matcher; `None` when the list is empty.
fn compile_patterns(patterns: &[String]) -> Result<Option<GlobSet>, ConfigError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|source| ConfigError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|source| ConfigError::Glob {
            pattern: patterns.join(", "),
            source,
        })
}

/// Compile a single file-name pattern.
pub(crate) fn compile_pattern(pattern: &str) -> Result<globset::GlobMatcher, ConfigError> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ConfigError::Glob {
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
#[path = "../tests/settings_tests.rs"]
mod tests;
