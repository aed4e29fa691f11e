//! Module descriptor model.
//!
//! A [`ModuleDescriptor`] is the in-memory form of a compiled or declared
//! `module-info`: its name plus the `requires`, `exports`, `uses` and
//! `provides` directives. Descriptors are immutable once built and can only be
//! created through a [`Builder`].

use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised while building a descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("module name must not be empty")]
    EmptyName,
}

/// Modifier on a `requires` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// Compile-time only, optional at run time.
    Static,
    /// Re-exported to consumers of the requiring module.
    Transitive,
}

/// A `requires` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Requires {
    name: String,
    modifiers: BTreeSet<Modifier>,
}

impl Requires {
    /// Name of the required module.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modifiers of this dependence (possibly empty).
    #[must_use]
    pub fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.modifiers
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    #[must_use]
    pub fn is_transitive(&self) -> bool {
        self.modifiers.contains(&Modifier::Transitive)
    }
}

/// An `exports` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Exports {
    source: String,
    /// `None` exports to every module.
    targets: Option<BTreeSet<String>>,
}

impl Exports {
    /// Exported package name, dot separated.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Target modules of a qualified export.
    #[must_use]
    pub fn targets(&self) -> Option<&BTreeSet<String>> {
        self.targets.as_ref()
    }

    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.targets.is_some()
    }
}

/// A `provides ... with ...` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Provides {
    service: String,
    providers: Vec<String>,
}

impl Provides {
    /// Fully qualified service type.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Implementation classes, in declaration order.
    #[must_use]
    pub fn providers(&self) -> &[String] {
        &self.providers
    }
}

/// An immutable module descriptor.
///
/// Equality is structural over every field. The set-valued fields compare as
/// sets, so two descriptors declaring the same directives in a different order
/// are equal; iteration still follows declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    name: String,
    automatic: bool,
    requires: IndexSet<Requires>,
    exports: IndexSet<Exports>,
    uses: IndexSet<String>,
    provides: IndexSet<Provides>,
}

impl ModuleDescriptor {
    /// Start building a declared (explicit) module.
    pub fn new_module(name: impl Into<String>) -> Builder {
        Builder::new(name.into(), false)
    }

    /// Start building an automatic module, i.e. a name derived for a
    /// non-modular artifact.
    pub fn new_automatic_module(name: impl Into<String>) -> Builder {
        Builder::new(name.into(), true)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    #[must_use]
    pub fn requires(&self) -> &IndexSet<Requires> {
        &self.requires
    }

    #[must_use]
    pub fn exports(&self) -> &IndexSet<Exports> {
        &self.exports
    }

    #[must_use]
    pub fn uses(&self) -> &IndexSet<String> {
        &self.uses
    }

    #[must_use]
    pub fn provides(&self) -> &IndexSet<Provides> {
        &self.provides
    }

    /// Names of all required modules, in declaration order.
    pub fn requires_names(&self) -> impl Iterator<Item = &str> {
        self.requires.iter().map(Requires::name)
    }
}

/// Builder for [`ModuleDescriptor`].
#[derive(Debug, Clone)]
pub struct Builder {
    name: String,
    automatic: bool,
    requires: IndexSet<Requires>,
    exports: IndexSet<Exports>,
    uses: IndexSet<String>,
    provides: IndexSet<Provides>,
}

impl Builder {
    fn new(name: String, automatic: bool) -> Self {
        Self {
            name,
            automatic,
            requires: IndexSet::new(),
            exports: IndexSet::new(),
            uses: IndexSet::new(),
            provides: IndexSet::new(),
        }
    }

    /// Add a dependence with an empty set of modifiers.
    pub fn requires(self, name: impl Into<String>) -> Self {
        self.requires_with([], name)
    }

    /// Add a dependence with the given (possibly empty) set of modifiers.
    pub fn requires_with(
        mut self,
        modifiers: impl IntoIterator<Item = Modifier>,
        name: impl Into<String>,
    ) -> Self {
        self.requires.insert(Requires {
            name: name.into(),
            modifiers: modifiers.into_iter().collect(),
        });
        self
    }

    /// Export a package to all modules.
    pub fn exports(mut self, source: impl Into<String>) -> Self {
        self.exports.insert(Exports {
            source: source.into(),
            targets: None,
        });
        self
    }

    /// Export a package to the given modules only.
    pub fn exports_to<I, S>(mut self, source: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports.insert(Exports {
            source: source.into(),
            targets: Some(targets.into_iter().map(Into::into).collect()),
        });
        self
    }

    /// Add a service dependence.
    pub fn uses(mut self, service: impl Into<String>) -> Self {
        self.uses.insert(service.into());
        self
    }

    /// Add service implementations.
    pub fn provides<I, S>(mut self, service: impl Into<String>, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides.insert(Provides {
            service: service.into(),
            providers: providers.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Freeze the descriptor.
    ///
    /// # Errors
    /// Returns [`DescriptorError::EmptyName`] when the module name is empty.
    pub fn build(self) -> Result<ModuleDescriptor, DescriptorError> {
        if self.name.is_empty() {
            return Err(DescriptorError::EmptyName);
        }

        Ok(ModuleDescriptor {
            name: self.name,
            automatic: self.automatic,
            requires: self.requires,
            exports: self.exports,
            uses: self.uses,
            provides: self.provides,
        })
    }
}
