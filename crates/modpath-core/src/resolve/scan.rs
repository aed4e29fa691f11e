//! Per-element scan.
//!
//! Each element is checked for a compiled descriptor and then for a manifest
//! name on the rayon pool. Elements still unnamed afterwards go to the
//! configured [`ModuleNamesExtractor`] in a single batch.

use super::result::ResolvePathResult;
use crate::descriptor::ModuleDescriptor;
use crate::error::Result;
use crate::locate::{self, LocateMode};
use crate::names::{ManifestModuleNameExtractor, ModuleNameSource, ModuleNamesExtractor};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `Ok(None)` means the element exists as far as we can tell but has no name
/// yet.
type Lookup = Result<Option<ResolvePathResult>>;

pub(crate) struct Scanner<'a> {
    pub(crate) manifest: ManifestModuleNameExtractor,
    pub(crate) names: &'a dyn ModuleNamesExtractor,
    pub(crate) release: Option<u16>,
    pub(crate) threads: Option<usize>,
}

impl Scanner<'_> {
    /// Scan every path; the output is in input order.
    pub(crate) fn scan(&self, paths: &[PathBuf]) -> Vec<Result<ResolvePathResult>> {
        let lookups = self.look_up_all(paths);

        let unnamed: Vec<PathBuf> = lookups
            .iter()
            .zip(paths)
            .filter(|(lookup, _)| matches!(lookup, Ok(None)))
            .map(|(_, path)| path.clone())
            .collect();

        let names = if unnamed.is_empty() {
            HashMap::new()
        } else {
            match self.names.names_for_paths(&unnamed) {
                Ok(names) => names,
                Err(e) => {
                    warn!(error = %e, elements = unnamed.len(), "module name extraction failed");
                    HashMap::new()
                }
            }
        };

        lookups
            .into_iter()
            .zip(paths)
            .map(|(lookup, path)| match lookup {
                Ok(Some(found)) => Ok(found),
                Ok(None) => Ok(names
                    .get(path)
                    .and_then(|name| automatic(name, ModuleNameSource::Filename))
                    .unwrap_or_default()),
                Err(e) => Err(e),
            })
            .collect()
    }

    fn look_up_all(&self, paths: &[PathBuf]) -> Vec<Lookup> {
        let run = || -> Vec<Lookup> { paths.par_iter().map(|path| self.look_up(path)).collect() };

        match self.threads {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    warn!(error = %e, threads, "failed to build scan pool, using the global pool");
                    run()
                }
            },
            None => run(),
        }
    }

    fn look_up(&self, path: &Path) -> Lookup {
        if let Some(descriptor) = locate::describe_path(path, self.release, LocateMode::Lenient)? {
            debug!(path = %path.display(), module = descriptor.name(), "found module descriptor");
            return Ok(Some(ResolvePathResult::named(
                descriptor,
                ModuleNameSource::ModuleDescriptor,
            )));
        }

        if let Some(name) = self.manifest.extract(path)? {
            debug!(path = %path.display(), module = %name, "found Automatic-Module-Name");
            return Ok(automatic(&name, ModuleNameSource::Manifest));
        }

        Ok(None)
    }
}

fn automatic(name: &str, source: ModuleNameSource) -> Option<ResolvePathResult> {
    ModuleDescriptor::new_automatic_module(name)
        .build()
        .ok()
        .map(|descriptor| ResolvePathResult::named(descriptor, source))
}
