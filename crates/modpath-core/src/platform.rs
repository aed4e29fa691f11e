//! Java platform detection.

use crate::classfile::JavaVersion;
use crate::error::{Error, Result};
use crate::names::parse_properties;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

/// `JAVA_VERSION` from `<java_home>/release`, if the file exists.
pub fn release_file_version(java_home: &Path) -> Result<Option<JavaVersion>> {
    let release = java_home.join("release");
    let Some(bytes) = modpath_util::fs::read_if_exists(&release).map_err(|e| Error::io(&release, e))?
    else {
        return Ok(None);
    };
    let props = parse_properties(&String::from_utf8_lossy(&bytes));
    Ok(props
        .get("JAVA_VERSION")
        .map(|v| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
        .map(JavaVersion::parse))
}

/// `java_home`, or `$JAVA_HOME` when not given.
#[must_use]
pub fn java_home(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(JAVA_HOME_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Feature release of the configured JDK, used as the default multi-release
/// bound. `None` when no JDK can be found.
#[must_use]
pub fn detect_release(explicit_home: Option<&Path>) -> Option<u16> {
    let home = java_home(explicit_home)?;
    match release_file_version(&home) {
        Ok(Some(version)) => {
            let release = version.feature().and_then(|f| u16::try_from(f).ok());
            debug!(java_home = %home.display(), version = %version, ?release, "detected java release");
            release
        }
        Ok(None) => None,
        Err(e) => {
            debug!(java_home = %home.display(), error = %e, "could not read java release file");
            None
        }
    }
}
