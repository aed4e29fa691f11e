//! Module path / classpath partitioning.
//!
//! [`LocationManager::resolve_paths`] runs in phases:
//! - Phase A: resolve the main descriptor (the only fatal step)
//! - Phase B: scan every path element concurrently
//! - Phase C: index named modules and service providers, first name wins
//! - Phase D: compute the closure of required module names
//! - Phase E: partition elements in request order

mod closure;
mod request;
mod result;
mod scan;

pub use request::{MainDescriptor, ResolvePathRequest, ResolvePathsRequest};
pub use result::{ResolvePathResult, ResolvePathsResult};

pub use crate::names::ModuleNameSource;

use crate::classfile;
use crate::config::Config;
use crate::descriptor::ModuleDescriptor;
use crate::error::{Error, Result};
use crate::locate::{self, LocateMode};
use crate::names::{FilenameModuleNameExtractor, ManifestModuleNameExtractor, ModuleNamesExtractor};
use crate::source::{ModuleInfoSourceParser, SourceModuleInfoParser};
use closure::Closure;
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use modpath_util::fs::has_extension_ignore_case;
use scan::Scanner;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Entry point for classifying path elements.
#[derive(Debug, Clone)]
pub struct LocationManager {
    source_parser: Arc<dyn SourceModuleInfoParser>,
    names_extractor: Arc<dyn ModuleNamesExtractor>,
    scan_threads: Option<usize>,
}

impl Default for LocationManager {
    fn default() -> Self {
        Self {
            source_parser: Arc::new(ModuleInfoSourceParser),
            names_extractor: Arc::new(FilenameModuleNameExtractor),
            scan_threads: None,
        }
    }
}

impl LocationManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager using the config's name extractor and scan pool size.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            names_extractor: config.name_extractor.build(),
            scan_threads: config.scan_threads,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_source_parser(mut self, parser: Arc<dyn SourceModuleInfoParser>) -> Self {
        self.source_parser = parser;
        self
    }

    #[must_use]
    pub fn with_names_extractor(mut self, extractor: Arc<dyn ModuleNamesExtractor>) -> Self {
        self.names_extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_scan_threads(mut self, threads: Option<usize>) -> Self {
        self.scan_threads = threads;
        self
    }

    fn scanner(&self, release: Option<u16>) -> Scanner<'_> {
        Scanner {
            manifest: ManifestModuleNameExtractor,
            names: self.names_extractor.as_ref(),
            release,
            threads: self.scan_threads,
        }
    }

    /// Read the descriptor of a main module.
    ///
    /// `path` is a `module-info.java`, a `module-info.class`, or a
    /// directory/JAR/JMOD that must contain a compiled descriptor.
    pub fn parse_module_descriptor(&self, path: &Path) -> Result<ResolvePathResult> {
        self.read_main_descriptor(path, None)
    }

    fn read_main_descriptor(&self, path: &Path, release: Option<u16>) -> Result<ResolvePathResult> {
        let descriptor = if has_extension_ignore_case(path, "java") {
            self.source_parser.parse(path)?
        } else if has_extension_ignore_case(path, "class") {
            let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
            classfile::parse_module_descriptor(&bytes).map_err(|e| Error::classfile(path, e))?
        } else {
            locate::describe_path(path, release, LocateMode::Required)?.ok_or_else(|| {
                Error::MissingDescriptor {
                    path: path.to_path_buf(),
                }
            })?
        };

        debug!(path = %path.display(), module = descriptor.name(), "read main module descriptor");
        Ok(ResolvePathResult {
            descriptor: Some(descriptor),
            module_name_source: Some(ModuleNameSource::ModuleDescriptor),
        })
    }

    /// Determine the module name of a single path element.
    pub fn resolve_path<T: AsRef<Path>>(&self, request: &ResolvePathRequest<T>) -> Result<ResolvePathResult> {
        let path = request.path.as_ref().to_path_buf();
        self.scanner(request.release)
            .scan(std::slice::from_ref(&path))
            .pop()
            .unwrap_or_else(|| Ok(ResolvePathResult::default()))
    }

    /// Partition path elements into module path and classpath.
    ///
    /// Failures on individual elements are reported in
    /// [`ResolvePathsResult::path_errors`]; only a main descriptor that cannot
    /// be read fails the whole call.
    pub fn resolve_paths<T>(&self, request: &ResolvePathsRequest<T>) -> Result<ResolvePathsResult<T>>
    where
        T: AsRef<Path> + Clone + Eq + Hash,
    {
        // Phase A: main descriptor
        let main = match &request.main_module_descriptor {
            None => None,
            Some(MainDescriptor::Resolved(descriptor)) => Some(descriptor.clone()),
            Some(MainDescriptor::Path(path)) => {
                self.read_main_descriptor(path, request.release)?.descriptor
            }
        };
        let mut result = ResolvePathsResult::new(main);

        // Phase B: scan
        let elements: IndexSet<T> = request.path_elements.iter().cloned().collect();
        let paths: Vec<PathBuf> = elements.iter().map(|e| e.as_ref().to_path_buf()).collect();
        let scanned = self.scanner(request.release).scan(&paths);

        // Phase C: index
        let mut available: IndexMap<String, ModuleDescriptor> = IndexMap::new();
        let mut providers_of: IndexMap<String, IndexSet<String>> = IndexMap::new();
        if request.include_all_providers {
            if let Some(main) = &result.main_module_descriptor {
                register_providers(&mut providers_of, main);
            }
        }

        let mut resolved: Vec<(T, ResolvePathResult)> = Vec::with_capacity(elements.len());
        for (element, outcome) in elements.into_iter().zip(scanned) {
            match outcome {
                Ok(found) => {
                    if let Some(descriptor) = &found.descriptor {
                        available
                            .entry(descriptor.name().to_string())
                            .or_insert_with(|| descriptor.clone());
                        if request.include_all_providers {
                            register_providers(&mut providers_of, descriptor);
                        }
                    }
                    result
                        .path_elements
                        .insert(element.clone(), found.descriptor.clone());
                    resolved.push((element, found));
                }
                Err(e) => {
                    warn!(element = %element.as_ref().display(), error = %e, "skipping path element");
                    result.path_elements.insert(element.clone(), None);
                    result.path_errors.insert(element, e);
                }
            }
        }

        // Phase D: closure
        let mut closure = Closure::new(&available, &providers_of, request.include_static);
        if let Some(main) = &result.main_module_descriptor {
            closure.add_root(main);
        }
        for name in &request.additional_modules {
            closure.add_module(name);
        }
        let required = closure.into_required();

        // Phase E: partition
        let mut placed: IndexMap<String, PathBuf> = IndexMap::new();
        for (element, found) in resolved {
            let Some(descriptor) = found
                .descriptor
                .filter(|d| required.contains(d.name()))
            else {
                result.classpath_elements.insert(element);
                continue;
            };
            let source = found
                .module_name_source
                .unwrap_or(ModuleNameSource::Filename);

            match placed.entry(descriptor.name().to_string()) {
                Entry::Occupied(first) => {
                    warn!(
                        element = %element.as_ref().display(),
                        module = descriptor.name(),
                        first = %first.get().display(),
                        "duplicate module on module path"
                    );
                    result.path_errors.insert(
                        element,
                        Error::DuplicateModuleName {
                            name: descriptor.name().to_string(),
                            first: first.get().clone(),
                        },
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(element.as_ref().to_path_buf());
                    result.modulepath_elements.insert(element, source);
                }
            }
        }

        let order = &result.path_elements;
        result
            .path_errors
            .sort_by(|a, _, b, _| order.get_index_of(a).cmp(&order.get_index_of(b)));

        debug!(
            module_path = result.modulepath_elements.len(),
            class_path = result.classpath_elements.len(),
            errors = result.path_errors.len(),
            "resolved path elements"
        );
        Ok(result)
    }
}

fn register_providers(providers_of: &mut IndexMap<String, IndexSet<String>>, module: &ModuleDescriptor) {
    for provides in module.provides() {
        providers_of
            .entry(provides.service().to_string())
            .or_default()
            .insert(module.name().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_paths() {
        let manager = LocationManager::new();
        let main = ModuleDescriptor::new_module("base").build().unwrap();
        let request = ResolvePathsRequest::<PathBuf>::of_descriptor(main.clone(), []);
        let result = manager.resolve_paths(&request).unwrap();

        assert_eq!(result.main_module_descriptor, Some(main));
        assert!(result.path_elements.is_empty());
        assert!(result.modulepath_elements.is_empty());
        assert!(result.classpath_elements.is_empty());
        assert!(result.path_errors.is_empty());
    }

    #[test]
    fn test_unknown_requires_is_ignored() {
        let manager = LocationManager::new();
        let main = ModuleDescriptor::new_module("base")
            .requires("java.base")
            .requires("jdk.net")
            .build()
            .unwrap();
        let request = ResolvePathsRequest::<PathBuf>::of_descriptor(main, []);
        let result = manager.resolve_paths(&request).unwrap();
        assert!(result.path_errors.is_empty());
    }

    #[test]
    fn test_missing_main_descriptor_fails() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LocationManager::new();
        let request = ResolvePathsRequest::<PathBuf>::of_main_path(dir.path(), []);
        let err = manager.resolve_paths(&request).unwrap_err();
        assert!(matches!(err, Error::MissingDescriptor { .. }));

        let gone = dir.path().join("gone");
        let request = ResolvePathsRequest::<PathBuf>::of_main_path(&gone, []);
        let err = manager.resolve_paths(&request).unwrap_err();
        assert!(matches!(err, Error::MissingDescriptor { .. }));
    }

    #[test]
    fn test_main_descriptor_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("module-info.java");
        std::fs::write(&source, "module org.example.main { requires java.sql; }").unwrap();

        let found = LocationManager::new().parse_module_descriptor(&source).unwrap();
        assert_eq!(found.module_name(), Some("org.example.main"));
        assert_eq!(found.module_name_source, Some(ModuleNameSource::ModuleDescriptor));
    }

    #[test]
    fn test_duplicate_handles_collapse() {
        let dir = tempfile::tempdir().unwrap();
        let classes = dir.path().join("classes");
        std::fs::create_dir(&classes).unwrap();

        let request = ResolvePathsRequest::of_elements([classes.clone(), classes.clone()]);
        let result = LocationManager::new().resolve_paths(&request).unwrap();
        assert_eq!(result.path_elements.len(), 1);
        assert_eq!(result.classpath_elements.len(), 1);
    }
}
