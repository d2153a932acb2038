//! Module discovery and exported-type scanning.
//!
//! Faults are local: a module that fails to load or to enumerate is logged
//! and skipped, and types yielded before an enumeration fault are kept.

use crate::options::ResolverOptions;
use crate::settings::compile_pattern;
use rustc_hash::FxHashSet;
use std::path::Path;
use tracing::{debug, info, warn};
use tyres_types::{ModuleLoader, TypeId, TypeStore};
use walkdir::WalkDir;

/// Names of the modules to scan, in scan order.
///
/// The candidate list comes from the custom module-name source when one is
/// configured, otherwise from the loader plus the probe directory. Candidates
/// are filtered by the module predicates, then the additional modules are
/// appended. Duplicates keep their first position.
pub fn module_names(loader: &dyn ModuleLoader, options: &ResolverOptions) -> Vec<String> {
    let candidates = match &options.module_names_resolver {
        Some(source) => source(),
        None => {
            let mut names = loader.module_names();
            if let Some(dir) = &options.probe_directory {
                names.extend(probe_modules(dir, &options.probe_pattern));
            }
            names
        }
    };

    let mut seen = FxHashSet::default();
    candidates
        .into_iter()
        .filter(|name| options.admits_module(name))
        .chain(options.additional_modules.iter().cloned())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Module names for files in `dir` whose file name matches `pattern`.
///
/// Only the directory itself is searched; the file stem is the module name.
pub fn probe_modules(dir: &Path, pattern: &str) -> Vec<String> {
    let matcher = match compile_pattern(pattern) {
        Ok(matcher) => matcher,
        Err(err) => {
            warn!(%err, "skipping module probe");
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "failed to probe module directory");
                continue;
            }
        };
        if !entry.file_type().is_file() || !matcher.is_match(entry.file_name()) {
            continue;
        }
        if let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    debug!(dir = %dir.display(), probed = names.len(), "probed module directory");
    names
}

/// Exported, non-excluded types of every module in `names`, in scan order.
pub fn scan_types(
    store: &TypeStore,
    loader: &dyn ModuleLoader,
    names: &[String],
    options: &ResolverOptions,
) -> Vec<TypeId> {
    let mut types = Vec::new();
    let mut scanned = 0usize;

    for name in names {
        let module = match loader.load(name) {
            Ok(module) => module,
            Err(err) => {
                warn!(module = %name, %err, "skipping module");
                continue;
            }
        };
        let exported = match module.exported_types() {
            Ok(exported) => exported,
            Err(err) => {
                warn!(module = %name, %err, "skipping module");
                continue;
            }
        };

        scanned += 1;
        for item in exported {
            let id = match item {
                Ok(id) => id,
                Err(err) => {
                    warn!(module = %name, %err, "type enumeration aborted");
                    break;
                }
            };
            let Some(ty) = store.get(id) else {
                debug!(module = %name, type_id = %id, "exported type not in store");
                continue;
            };
            if !ty.is_public() {
                debug!(module = %name, ty = %ty.metadata_full_name(), "type not public");
                continue;
            }
            if options.excludes_type(&ty) {
                debug!(module = %name, ty = %ty.metadata_full_name(), "type excluded");
                continue;
            }
            types.push(id);
        }
    }

    info!(
        modules = names.len(),
        scanned,
        types = types.len(),
        "module scan finished"
    );
    types
}

#[cfg(test)]
#[path = "../tests/scan_tests.rs"]
mod tests;
