use crate::classfile::ClassfileError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stable error codes.
pub mod codes {
    pub const MODPATH_MALFORMED_CLASSFILE: &str = "MODPATH_MALFORMED_CLASSFILE";
    pub const MODPATH_NOT_A_MODULE: &str = "MODPATH_NOT_A_MODULE";
    pub const MODPATH_INVALID_ARGUMENT: &str = "MODPATH_INVALID_ARGUMENT";
    pub const MODPATH_MISSING_DESCRIPTOR: &str = "MODPATH_MISSING_DESCRIPTOR";
    pub const MODPATH_DUPLICATE_MODULE: &str = "MODPATH_DUPLICATE_MODULE";
    pub const MODPATH_EXTERNAL_TOOL: &str = "MODPATH_EXTERNAL_TOOL";
    pub const MODPATH_SOURCE_DESCRIPTOR: &str = "MODPATH_SOURCE_DESCRIPTOR";
    pub const MODPATH_ARCHIVE: &str = "MODPATH_ARCHIVE";
    pub const MODPATH_IO: &str = "MODPATH_IO";
    pub const MODPATH_CONFIG_READ: &str = "MODPATH_CONFIG_READ";
    pub const MODPATH_CONFIG_PARSE: &str = "MODPATH_CONFIG_PARSE";
    pub const MODPATH_OTHER: &str = "MODPATH_OTHER";
}

/// Core error type for modpath operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed class file {path}: {source}")]
    MalformedClassFile {
        path: PathBuf,
        #[source]
        source: ClassfileError,
    },

    #[error("{path} is not a module descriptor")]
    NotAModule { path: PathBuf },

    #[error("Invalid path element {path}: {reason}")]
    InvalidArgument { path: PathBuf, reason: String },

    #[error("No module-info.class found in {path}")]
    MissingDescriptor { path: PathBuf },

    #[error("Module '{name}' is already provided by {first}")]
    DuplicateModuleName { name: String, first: PathBuf },

    #[error("Module name extraction failed: {0}")]
    ExternalTool(String),

    #[error("Failed to read source descriptor {path}: {message}")]
    SourceDescriptor { path: PathBuf, message: String },

    #[error("Failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }

    /// Map a class-file parse failure, keeping "not a module" distinct from
    /// corrupt input.
    pub(crate) fn classfile(path: impl Into<PathBuf>, source: ClassfileError) -> Self {
        let path = path.into();
        if source.is_not_a_module() {
            Self::NotAModule { path }
        } else {
            Self::MalformedClassFile { path, source }
        }
    }

    /// Stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedClassFile { .. } => codes::MODPATH_MALFORMED_CLASSFILE,
            Self::NotAModule { .. } => codes::MODPATH_NOT_A_MODULE,
            Self::InvalidArgument { .. } => codes::MODPATH_INVALID_ARGUMENT,
            Self::MissingDescriptor { .. } => codes::MODPATH_MISSING_DESCRIPTOR,
            Self::DuplicateModuleName { .. } => codes::MODPATH_DUPLICATE_MODULE,
            Self::ExternalTool(_) => codes::MODPATH_EXTERNAL_TOOL,
            Self::SourceDescriptor { .. } => codes::MODPATH_SOURCE_DESCRIPTOR,
            Self::Archive { .. } => codes::MODPATH_ARCHIVE,
            Self::Io { .. } => codes::MODPATH_IO,
            Self::ConfigRead { .. } => codes::MODPATH_CONFIG_READ,
            Self::ConfigParse { .. } => codes::MODPATH_CONFIG_PARSE,
            Self::Other(_) => codes::MODPATH_OTHER,
        }
    }

    /// Path the error is about, if it carries one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MalformedClassFile { path, .. }
            | Self::NotAModule { path }
            | Self::InvalidArgument { path, .. }
            | Self::MissingDescriptor { path }
            | Self::SourceDescriptor { path, .. }
            | Self::Archive { path, .. }
            | Self::Io { path, .. }
            | Self::ConfigRead { path, .. }
            | Self::ConfigParse { path, .. } => Some(path),
            Self::DuplicateModuleName { .. } | Self::ExternalTool(_) | Self::Other(_) => None,
        }
    }

    /// Serializable projection of this error for the given element.
    #[must_use]
    pub fn info(&self, element: &Path) -> ErrorInfo {
        ErrorInfo::new(self.code(), element.to_string_lossy(), self.to_string())
    }
}

/// Error entry as reported in machine-readable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable error code.
    pub code: String,
    /// Path element the error belongs to.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorInfo {
    #[must_use]
    pub fn new(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_uppercase_and_prefixed() {
        let all = [
            codes::MODPATH_MALFORMED_CLASSFILE,
            codes::MODPATH_NOT_A_MODULE,
            codes::MODPATH_INVALID_ARGUMENT,
            codes::MODPATH_MISSING_DESCRIPTOR,
            codes::MODPATH_DUPLICATE_MODULE,
            codes::MODPATH_EXTERNAL_TOOL,
            codes::MODPATH_SOURCE_DESCRIPTOR,
            codes::MODPATH_ARCHIVE,
            codes::MODPATH_IO,
            codes::MODPATH_CONFIG_READ,
            codes::MODPATH_CONFIG_PARSE,
            codes::MODPATH_OTHER,
        ];
        for code in all {
            assert_eq!(code, code.to_uppercase());
            assert!(code.starts_with("MODPATH_"));
        }
    }

    #[test]
    fn test_classfile_not_a_module_maps_to_not_a_module() {
        let err = Error::classfile("a/module-info.class", ClassfileError::NotAModule);
        assert_eq!(err.code(), codes::MODPATH_NOT_A_MODULE);

        let err = Error::classfile("a/module-info.class", ClassfileError::BadMagic(0));
        assert_eq!(err.code(), codes::MODPATH_MALFORMED_CLASSFILE);
    }

    #[test]
    fn test_duplicate_message() {
        let err = Error::DuplicateModuleName {
            name: "org.example".to_string(),
            first: PathBuf::from("lib/a.jar"),
        };
        assert_eq!(
            err.to_string(),
            "Module 'org.example' is already provided by lib/a.jar"
        );
        assert!(err.path().is_none());
    }

    #[test]
    fn test_info_projection() {
        let err = Error::InvalidArgument {
            path: PathBuf::from("pom.xml"),
            reason: "not a directory, jar or jmod".to_string(),
        };
        let info = err.info(Path::new("pom.xml"));
        assert_eq!(info.code, codes::MODPATH_INVALID_ARGUMENT);
        assert_eq!(info.path, "pom.xml");
        assert!(info.message.contains("pom.xml"));
    }
}
