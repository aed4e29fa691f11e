use crate::error::{Error, Result};
use crate::names::{
    FilenameModuleNameExtractor, ModuleNamesExtractor, ProcessModuleNameExtractor,
    DEFAULT_TIMEOUT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Runtime configuration for modpath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// JDK used to pick the default release. Falls back to `$JAVA_HOME`.
    pub java_home: Option<PathBuf>,

    /// Upper bound for multi-release descriptor selection.
    pub release: Option<u16>,

    /// Follow `requires static` edges of non-root modules.
    pub include_static: bool,

    /// Pull in every module providing a service used along the closure.
    pub include_all_providers: bool,

    /// Extra root modules.
    pub add_modules: Vec<String>,

    /// Dedicated scan pool size; `None` uses the global rayon pool.
    pub scan_threads: Option<usize>,

    /// Fallback naming for artifacts without descriptor or manifest name.
    pub name_extractor: NameExtractorConfig,
}

/// How automatic module names are derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NameExtractorConfig {
    /// From the JAR file name.
    #[default]
    Filename,
    /// From an external program printing `path=name` properties.
    Process {
        program: PathBuf,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl NameExtractorConfig {
    #[must_use]
    pub fn build(&self) -> Arc<dyn ModuleNamesExtractor> {
        match self {
            Self::Filename => Arc::new(FilenameModuleNameExtractor),
            Self::Process {
                program,
                args,
                timeout_ms,
            } => Arc::new(
                ProcessModuleNameExtractor::new(program.clone())
                    .with_args(args.iter().cloned())
                    .with_timeout(Duration::from_millis(*timeout_ms)),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            java_home: None,
            release: None,
            include_static: false,
            include_all_providers: false,
            add_modules: Vec::new(),
            scan_threads: None,
            name_extractor: NameExtractorConfig::default(),
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Load a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve a possibly relative path against `cwd`.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Release bound to use: the configured one, else the JDK's.
    #[must_use]
    pub fn effective_release(&self) -> Option<u16> {
        self.release
            .or_else(|| crate::platform::detect_release(self.java_home.as_deref()))
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    #[must_use]
    pub fn with_release(mut self, release: Option<u16>) -> Self {
        self.release = release;
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

    /// Append extra root modules.
    #[must_use]
    pub fn with_add_modules(mut self, modules: impl IntoIterator<Item = String>) -> Self {
        self.add_modules.extend(modules);
        self
    }
}
