//! Resolution results.

use crate::descriptor::ModuleDescriptor;
use crate::error::Error;
use crate::names::ModuleNameSource;
use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

/// Outcome for a single path element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvePathResult {
    /// Declared or automatic descriptor, if any could be determined.
    pub descriptor: Option<ModuleDescriptor>,
    pub module_name_source: Option<ModuleNameSource>,
}

impl ResolvePathResult {
    pub(crate) fn named(descriptor: ModuleDescriptor, source: ModuleNameSource) -> Self {
        Self {
            descriptor: Some(descriptor),
            module_name_source: Some(source),
        }
    }

    #[must_use]
    pub fn module_name(&self) -> Option<&str> {
        self.descriptor.as_ref().map(ModuleDescriptor::name)
    }
}

/// Partition of path elements into module path and classpath.
///
/// Every map preserves the order of the request's path elements.
#[derive(Debug)]
pub struct ResolvePathsResult<T> {
    pub main_module_descriptor: Option<ModuleDescriptor>,
    /// Every element, with its descriptor when one was found. Elements in
    /// `path_errors` map to `None`.
    pub path_elements: IndexMap<T, Option<ModuleDescriptor>>,
    pub modulepath_elements: IndexMap<T, ModuleNameSource>,
    pub classpath_elements: IndexSet<T>,
    pub path_errors: IndexMap<T, Error>,
}

impl<T: Eq + Hash> ResolvePathsResult<T> {
    pub(crate) fn new(main_module_descriptor: Option<ModuleDescriptor>) -> Self {
        Self {
            main_module_descriptor,
            path_elements: IndexMap::new(),
            modulepath_elements: IndexMap::new(),
            classpath_elements: IndexSet::new(),
            path_errors: IndexMap::new(),
        }
    }
}
