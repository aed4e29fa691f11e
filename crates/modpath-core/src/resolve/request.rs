//! Resolution requests.

use crate::descriptor::ModuleDescriptor;
use crate::platform::detect_release;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// The descriptor the closure starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainDescriptor {
    /// An already known descriptor.
    Resolved(ModuleDescriptor),
    /// `module-info.java`, `module-info.class`, or a directory/JAR/JMOD that
    /// must contain a compiled descriptor.
    Path(PathBuf),
}

/// Classify a set of path elements against a main module.
///
/// `T` is the caller's handle for an element; results are keyed by it.
#[derive(Debug, Clone)]
pub struct ResolvePathsRequest<T> {
    pub main_module_descriptor: Option<MainDescriptor>,
    pub path_elements: Vec<T>,
    pub additional_modules: Vec<String>,
    pub include_static: bool,
    pub include_all_providers: bool,
    /// Multi-release bound, defaulting to the release of the detected JDK.
    /// `None` takes the highest versioned descriptor.
    pub release: Option<u16>,
}

impl<T> Default for ResolvePathsRequest<T> {
    fn default() -> Self {
        Self {
            main_module_descriptor: None,
            path_elements: Vec::new(),
            additional_modules: Vec::new(),
            include_static: false,
            include_all_providers: false,
            release: detect_release(None),
        }
    }
}

impl<T> ResolvePathsRequest<T>
where
    T: AsRef<Path> + Clone + Eq + Hash,
{
    /// Request with a main descriptor read from `path`.
    pub fn of_main_path(path: impl Into<PathBuf>, elements: impl IntoIterator<Item = T>) -> Self {
        Self {
            main_module_descriptor: Some(MainDescriptor::Path(path.into())),
            path_elements: elements.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Request with an already resolved main descriptor.
    pub fn of_descriptor(descriptor: ModuleDescriptor, elements: impl IntoIterator<Item = T>) -> Self {
        Self {
            main_module_descriptor: Some(MainDescriptor::Resolved(descriptor)),
            path_elements: elements.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Request without a main module; only additional modules are roots.
    pub fn of_elements(elements: impl IntoIterator<Item = T>) -> Self {
        Self {
            path_elements: elements.into_iter().collect(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_additional_modules(mut self, modules: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.additional_modules = modules.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_include_static(mut self, include: bool) -> Self {
        self.include_static = include;
        self
    }

    #[must_use]
    pub fn with_include_all_providers(mut self, include: bool) -> Self {
        self.include_all_providers = include;
        self
    }

    #[must_use]
    pub fn with_release(mut self, release: Option<u16>) -> Self {
        self.release = release;
        self
    }
}

/// Classify one path element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvePathRequest<T> {
    pub path: T,
    pub release: Option<u16>,
}

impl<T: AsRef<Path>> ResolvePathRequest<T> {
    pub fn of(path: T) -> Self {
        Self {
            path,
            release: detect_release(None),
        }
    }

    #[must_use]
    pub fn with_release(mut self, release: Option<u16>) -> Self {
        self.release = release;
        self
    }
}
