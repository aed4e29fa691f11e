//! Automatic module names derived from JAR file names.

use super::ModuleNamesExtractor;
use crate::error::Result;
use modpath_util::fs::has_extension_ignore_case;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const RESERVED: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "true",
    "false",
    "null",
    "_",
];

/// Names regular `.jar` files the way the JDK names automatic modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameModuleNameExtractor;

impl ModuleNamesExtractor for FilenameModuleNameExtractor {
    fn names_for_paths(&self, paths: &[PathBuf]) -> Result<HashMap<PathBuf, String>> {
        Ok(paths
            .iter()
            .filter(|p| p.is_file() && has_extension_ignore_case(p, "jar"))
            .filter_map(|p| automatic_module_name(p).map(|name| (p.clone(), name)))
            .collect())
    }
}

/// Derive an automatic module name from a JAR path.
///
/// `commons-lang3-3.12.0.jar` becomes `commons.lang3`. Returns `None` when
/// nothing usable is left or a segment is not a legal identifier.
#[must_use]
pub fn automatic_module_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = match file_name.len().checked_sub(4) {
        Some(cut) if file_name.is_char_boundary(cut)
            && file_name[cut..].eq_ignore_ascii_case(".jar") =>
        {
            &file_name[..cut]
        }
        _ => file_name,
    };

    let base = &stem[..version_start(stem).unwrap_or(stem.len())];

    let mut name = String::with_capacity(base.len());
    for c in base.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '.' };
        if c == '.' && (name.is_empty() || name.ends_with('.')) {
            continue;
        }
        name.push(c);
    }
    while name.ends_with('.') {
        name.pop();
    }

    let valid = !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.starts_with(|c: char| c.is_ascii_digit()) && !RESERVED.contains(&segment)
        });
    valid.then_some(name)
}

/// Index of the first `-` followed by digits that run to a `.` or the end.
fn version_start(stem: &str) -> Option<usize> {
    let bytes = stem.as_bytes();
    (0..bytes.len()).find(|&i| {
        if bytes[i] != b'-' {
            return false;
        }
        let digits = bytes[i + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        digits > 0 && matches!(bytes.get(i + 1 + digits), None | Some(b'.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(file: &str) -> Option<String> {
        automatic_module_name(Path::new(file))
    }

    #[test]
    fn test_strips_version() {
        assert_eq!(name("commons-lang3-3.12.0.jar").as_deref(), Some("commons.lang3"));
        assert_eq!(name("jakarta.inject-api-2.0.1.jar").as_deref(), Some("jakarta.inject.api"));
        assert_eq!(name("foo-1.jar").as_deref(), Some("foo"));
        assert_eq!(name("lib/asm-9.6.JAR").as_deref(), Some("asm"));
    }

    #[test]
    fn test_version_needs_dot_or_end() {
        assert_eq!(name("foo-2x.jar"), None);
        assert_eq!(name("foo-bar2.jar").as_deref(), Some("foo.bar2"));
    }

    #[test]
    fn test_cleans_separators() {
        assert_eq!(name("--my__odd..lib--.jar").as_deref(), Some("my.odd.lib"));
        assert_eq!(name("plexus_java.jar").as_deref(), Some("plexus.java"));
    }

    #[test]
    fn test_rejects_illegal_names() {
        assert_eq!(name("-1.0.jar"), None);
        assert_eq!(name("foo.1bar.jar"), None);
        assert_eq!(name("native.jar"), None);
        assert_eq!(name("my.class.jar"), None);
        assert_eq!(name(".jar"), None);
    }

    #[test]
    fn test_extractor_only_names_existing_jars() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("guava-33.0.0-jre.jar");
        std::fs::write(&jar, b"").unwrap();
        let classes = dir.path().join("classes");
        std::fs::create_dir(&classes).unwrap();
        let missing = dir.path().join("missing-1.0.jar");

        let names = FilenameModuleNameExtractor
            .names_for_paths(&[jar.clone(), classes.clone(), missing.clone()])
            .unwrap();
        assert_eq!(names.get(&jar).map(String::as_str), Some("guava"));
        assert!(!names.contains_key(&classes));
        assert!(!names.contains_key(&missing));
    }
}
