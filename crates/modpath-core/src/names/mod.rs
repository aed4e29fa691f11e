//! Module names for artifacts without a compiled descriptor.
//!
//! Lookup order is the manifest's `Automatic-Module-Name` first, then a
//! batched [`ModuleNamesExtractor`].

mod filename;
mod process;
mod properties;

pub use filename::{automatic_module_name, FilenameModuleNameExtractor};
pub use process::{ProcessModuleNameExtractor, DEFAULT_TIMEOUT};
pub use properties::parse_properties;

use crate::error::Result;
use crate::locate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a module name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleNameSource {
    /// Derived from the file name, or reported by an extractor.
    Filename,
    /// `Automatic-Module-Name` in the JAR manifest.
    Manifest,
    /// A compiled `module-info.class`.
    ModuleDescriptor,
}

impl ModuleNameSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filename => "filename",
            Self::Manifest => "manifest",
            Self::ModuleDescriptor => "module_descriptor",
        }
    }
}

impl fmt::Display for ModuleNameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batched module name lookup for paths that have neither a descriptor nor a
/// manifest name. Paths without a name are simply missing from the map.
pub trait ModuleNamesExtractor: Send + Sync + fmt::Debug {
    fn names_for_paths(&self, paths: &[PathBuf]) -> Result<HashMap<PathBuf, String>>;
}

/// Reads `Automatic-Module-Name` from a JAR or an exploded directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestModuleNameExtractor;

impl ManifestModuleNameExtractor {
    pub fn extract(&self, path: &Path) -> Result<Option<String>> {
        Ok(locate::read_manifest(path)?
            .and_then(|m| m.automatic_module_name().map(str::to_string)))
    }
}
