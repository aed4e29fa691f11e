//! Module names reported by an external program.
//!
//! The program is started once per batch with every path as a trailing
//! argument and is expected to print `path=moduleName` lines in Java
//! properties format. A JDK launcher running a small `ModuleFinder` helper is
//! the usual program, for toolchains this crate cannot inspect itself.

use super::properties::parse_properties;
use super::ModuleNamesExtractor;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default time the external program may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ProcessModuleNameExtractor {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessModuleNameExtractor {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Arguments placed before the paths.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Bound on the whole run, including reading the program's output.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the program and return its stdout.
    ///
    /// Must not be called from inside an async runtime.
    fn run(&self, paths: &[PathBuf]) -> Result<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::ExternalTool(format!("failed to start runtime: {e}")))?;
        runtime.block_on(self.run_async(paths))
    }

    async fn run_async(&self, paths: &[PathBuf]) -> Result<String> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .args(paths)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::ExternalTool(format!("failed to start {}: {e}", self.program.display()))
            })?;

        // Output is read to EOF, so a descendant holding stdout open is also
        // under the deadline.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(Error::ExternalTool(format!(
                    "failed to wait for {}: {e}",
                    self.program.display()
                )));
            }
            Err(_) => {
                warn!(
                    program = %self.program.display(),
                    timeout_ms = self.timeout.as_millis(),
                    "module name extraction timed out"
                );
                return Err(Error::ExternalTool(format!(
                    "{} timed out after {}ms",
                    self.program.display(),
                    self.timeout.as_millis()
                )));
            }
        };

        if !output.status.success() {
            return Err(Error::ExternalTool(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ModuleNamesExtractor for ProcessModuleNameExtractor {
    fn names_for_paths(&self, paths: &[PathBuf]) -> Result<HashMap<PathBuf, String>> {
        if paths.is_empty() {
            return Ok(HashMap::new());
        }

        let absolute: Vec<PathBuf> = paths.iter().map(|p| absolutize(p)).collect();
        let stdout = self.run(&absolute)?;
        let properties = parse_properties(&stdout);
        debug!(
            program = %self.program.display(),
            requested = paths.len(),
            reported = properties.len(),
            "external module name extraction finished"
        );

        Ok(paths
            .iter()
            .zip(&absolute)
            .filter_map(|(path, abs)| {
                let name = properties.get(abs.to_string_lossy().as_ref())?.trim();
                (!name.is_empty()).then(|| (path.clone(), name.to_string()))
            })
            .collect())
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    /// Extractor running `body` through `/bin/sh`.
    fn shell(dir: &Path, body: &str) -> ProcessModuleNameExtractor {
        let path = dir.join("names.sh");
        std::fs::write(&path, body).unwrap();
        ProcessModuleNameExtractor::new("/bin/sh").with_args([path.to_string_lossy().into_owned()])
    }

    #[test]
    fn test_reads_properties_from_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = shell(
            dir.path(),
            "echo '#'\nfor p in \"$@\"; do echo \"$p=org.example.$(basename \"$p\" .jar)\"; done\n",
        );
        let a = dir.path().join("alpha.jar");
        let b = dir.path().join("beta.jar");

        let names = extractor.names_for_paths(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(names[&a], "org.example.alpha");
        assert_eq!(names[&b], "org.example.beta");
    }

    #[test]
    fn test_leading_args_are_passed() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("names.sh");
        std::fs::write(&script, "prefix=$1; shift; echo \"$1=$prefix\"\n").unwrap();
        let a = dir.path().join("a.jar");

        let names = ProcessModuleNameExtractor::new("/bin/sh")
            .with_args([script.to_string_lossy().into_owned(), "from.args".to_string()])
            .names_for_paths(&[a.clone()])
            .unwrap();
        assert_eq!(names[&a], "from.args");
    }

    #[test]
    fn test_unreported_paths_are_absent() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = shell(dir.path(), "echo \"$1=only.first\"\n");
        let a = dir.path().join("a.jar");
        let b = dir.path().join("b.jar");

        let names = extractor.names_for_paths(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[&a], "only.first");
    }

    #[test]
    fn test_nonzero_exit_is_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = shell(dir.path(), "exit 3\n")
            .names_for_paths(&[dir.path().join("a.jar")])
            .unwrap_err();
        assert!(matches!(err, Error::ExternalTool(_)));
    }

    #[test]
    fn test_timeout_kills_program() {
        let dir = tempfile::tempdir().unwrap();
        let start = Instant::now();
        let err = shell(dir.path(), "exec sleep 5\n")
            .with_timeout(Duration::from_millis(200))
            .names_for_paths(&[dir.path().join("a.jar")])
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_covers_background_descendants() {
        let dir = tempfile::tempdir().unwrap();
        let start = Instant::now();
        let err = shell(dir.path(), "sleep 6 &\necho \"$1=org.example.late\"\n")
            .with_timeout(Duration::from_millis(300))
            .names_for_paths(&[dir.path().join("a.jar")])
            .unwrap_err();
        assert!(err.to_string().contains("timed out"), "{err}");
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_missing_program() {
        let err = ProcessModuleNameExtractor::new("/nonexistent/modpath-names")
            .names_for_paths(&[PathBuf::from("/tmp/a.jar")])
            .unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }

    #[test]
    fn test_empty_batch_does_not_spawn() {
        let names = ProcessModuleNameExtractor::new("/nonexistent/modpath-names")
            .names_for_paths(&[])
            .unwrap();
        assert!(names.is_empty());
    }
}
