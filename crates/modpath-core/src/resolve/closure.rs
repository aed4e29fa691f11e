//! Dependency closure over named modules.

use crate::descriptor::ModuleDescriptor;
use indexmap::{IndexMap, IndexSet};

/// Computes the set of module names required from the roots.
///
/// Non-root modules only follow `requires static` edges when static
/// dependencies are included or the edge is also `transitive`. Services used
/// along the way pull in every known provider module.
pub(crate) struct Closure<'a> {
    available: &'a IndexMap<String, ModuleDescriptor>,
    providers_of: &'a IndexMap<String, IndexSet<String>>,
    include_static: bool,
    required: IndexSet<String>,
}

impl<'a> Closure<'a> {
    pub(crate) fn new(
        available: &'a IndexMap<String, ModuleDescriptor>,
        providers_of: &'a IndexMap<String, IndexSet<String>>,
        include_static: bool,
    ) -> Self {
        Self {
            available,
            providers_of,
            include_static,
            required: IndexSet::new(),
        }
    }

    /// Add the main module and its dependencies.
    pub(crate) fn add_root(&mut self, root: &ModuleDescriptor) {
        self.required.insert(root.name().to_string());
        self.select_requires(root, true);
    }

    /// Add an extra root module by name. Unknown names are ignored.
    pub(crate) fn add_module(&mut self, name: &str) {
        self.select_module(name, true);
    }

    pub(crate) fn into_required(self) -> IndexSet<String> {
        self.required
    }

    fn select_module(&mut self, name: &str, is_root: bool) {
        let available = self.available;
        if let Some(module) = available.get(name) {
            if self.required.insert(name.to_string()) {
                self.select_requires(module, is_root);
            }
        }
    }

    fn select_requires(&mut self, module: &ModuleDescriptor, is_root: bool) {
        for requires in module.requires() {
            if is_root || self.include_static || requires.is_transitive() || !requires.is_static() {
                self.select_module(requires.name(), false);
            }
        }

        let (available, providers_of) = (self.available, self.providers_of);
        for service in module.uses() {
            let Some(providers) = providers_of.get(service) else {
                continue;
            };
            for provider in providers {
                if let Some(descriptor) = available.get(provider) {
                    if self.required.insert(provider.clone()) {
                        self.select_requires(descriptor, false);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Modifier;

    fn pool(modules: Vec<ModuleDescriptor>) -> IndexMap<String, ModuleDescriptor> {
        modules
            .into_iter()
            .map(|m| (m.name().to_string(), m))
            .collect()
    }

    fn module(name: &str) -> crate::descriptor::Builder {
        ModuleDescriptor::new_module(name)
    }

    fn required(
        root: &ModuleDescriptor,
        available: &IndexMap<String, ModuleDescriptor>,
        providers: &IndexMap<String, IndexSet<String>>,
        include_static: bool,
    ) -> Vec<String> {
        let mut closure = Closure::new(available, providers, include_static);
        closure.add_root(root);
        closure.into_required().into_iter().collect()
    }

    #[test]
    fn test_cycles_terminate() {
        let available = pool(vec![
            module("a").requires("b").build().unwrap(),
            module("b").requires("a").build().unwrap(),
        ]);
        let root = module("root").requires("a").build().unwrap();
        let got = required(&root, &available, &IndexMap::new(), false);
        assert_eq!(got, vec!["root", "a", "b"]);
    }

    #[test]
    fn test_root_follows_static_edges() {
        let available = pool(vec![
            module("b").requires_with([Modifier::Static], "c").build().unwrap(),
            module("c").build().unwrap(),
            module("d").build().unwrap(),
        ]);
        let root = module("root")
            .requires("b")
            .requires_with([Modifier::Static], "d")
            .build()
            .unwrap();

        assert_eq!(
            required(&root, &available, &IndexMap::new(), false),
            vec!["root", "b", "d"]
        );
        assert_eq!(
            required(&root, &available, &IndexMap::new(), true),
            vec!["root", "b", "c", "d"]
        );
    }

    #[test]
    fn test_static_transitive_followed_once() {
        let available = pool(vec![
            module("b")
                .requires_with([Modifier::Static, Modifier::Transitive], "c")
                .build()
                .unwrap(),
            module("c").requires_with([Modifier::Static], "d").build().unwrap(),
            module("d").build().unwrap(),
        ]);
        let root = module("root").requires("b").build().unwrap();
        assert_eq!(
            required(&root, &available, &IndexMap::new(), false),
            vec!["root", "b", "c"]
        );
    }

    #[test]
    fn test_providers_pulled_through_uses() {
        let available = pool(vec![
            module("ghi").uses("tool").build().unwrap(),
            module("def")
                .requires("dep")
                .provides("tool", ["def.Impl"])
                .build()
                .unwrap(),
            module("dep").build().unwrap(),
        ]);
        let providers: IndexMap<String, IndexSet<String>> =
            [("tool".to_string(), IndexSet::from(["def".to_string()]))].into();
        let root = module("root").requires("ghi").build().unwrap();

        assert_eq!(
            required(&root, &available, &providers, false),
            vec!["root", "ghi", "def", "dep"]
        );
        assert_eq!(
            required(&root, &available, &IndexMap::new(), false),
            vec!["root", "ghi"]
        );
    }

    #[test]
    fn test_unknown_additional_module_ignored() {
        let available = pool(vec![
            module("x").requires_with([Modifier::Static], "y").build().unwrap(),
            module("y").build().unwrap(),
        ]);
        let providers = IndexMap::new();
        let mut closure = Closure::new(&available, &providers, false);
        closure.add_module("missing");
        closure.add_module("x");
        closure.add_module("x");
        let got: Vec<_> = closure.into_required().into_iter().collect();
        assert_eq!(got, vec!["x", "y"]);
    }
}
