//! Finding `module-info.class` in directories, JARs and JMODs.

mod manifest;

pub use manifest::{Manifest, AUTOMATIC_MODULE_NAME, MANIFEST_PATH, MULTI_RELEASE};

use crate::classfile;
use crate::descriptor::ModuleDescriptor;
use crate::error::{Error, Result};
use modpath_util::fs::{has_extension_ignore_case, read_if_exists};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

pub const MODULE_INFO_CLASS: &str = "module-info.class";
const JMOD_MODULE_INFO: &str = "classes/module-info.class";
const VERSIONS_PREFIX: &str = "META-INF/versions/";

/// First release that knows about modules.
pub const MIN_MODULE_RELEASE: u16 = 9;

/// Upper bound for preallocating an entry from its declared size.
const MAX_ENTRY_PREALLOC: usize = 1 << 20;

/// What to do when a directory or archive has no descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocateMode {
    /// Absence is a normal outcome.
    #[default]
    Lenient,
    /// Absence is [`Error::MissingDescriptor`].
    Required,
}

/// Kind of a path element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Directory,
    Jar,
    Jmod,
}

/// Raw descriptor bytes and the entry they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedModuleInfo {
    pub entry: String,
    pub bytes: Vec<u8>,
}

/// Classify a path element. `Ok(None)` when the path does not exist.
///
/// # Errors
/// [`Error::InvalidArgument`] for a regular file that is neither a JAR nor a
/// JMOD.
pub fn artifact_kind(path: &Path) -> Result<Option<ArtifactKind>> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };

    if meta.is_dir() {
        Ok(Some(ArtifactKind::Directory))
    } else if has_extension_ignore_case(path, "jar") {
        Ok(Some(ArtifactKind::Jar))
    } else if has_extension_ignore_case(path, "jmod") {
        Ok(Some(ArtifactKind::Jmod))
    } else {
        Err(Error::InvalidArgument {
            path: path.to_path_buf(),
            reason: "not a directory, jar or jmod".to_string(),
        })
    }
}

/// Find the module descriptor bytes of a path element.
///
/// For a multi-release JAR without a root descriptor, the entry under
/// `META-INF/versions/<v>/` with the greatest `v` in `9..=release` is used;
/// `release: None` means no upper bound.
pub fn locate_module_info(
    path: &Path,
    release: Option<u16>,
    mode: LocateMode,
) -> Result<Option<LocatedModuleInfo>> {
    let located = match artifact_kind(path)? {
        None => return Ok(None),
        Some(ArtifactKind::Directory) => {
            read_if_exists(&path.join(MODULE_INFO_CLASS))
                .map_err(|e| Error::io(path.join(MODULE_INFO_CLASS), e))?
                .map(|bytes| LocatedModuleInfo {
                    entry: MODULE_INFO_CLASS.to_string(),
                    bytes,
                })
        }
        Some(ArtifactKind::Jmod) => {
            let mut archive = open_archive(path)?;
            read_entry(&mut archive, path, JMOD_MODULE_INFO)?.map(|bytes| LocatedModuleInfo {
                entry: JMOD_MODULE_INFO.to_string(),
                bytes,
            })
        }
        Some(ArtifactKind::Jar) => locate_in_jar(path, release)?,
    };

    match (located, mode) {
        (None, LocateMode::Required) => Err(Error::MissingDescriptor {
            path: path.to_path_buf(),
        }),
        (located, _) => Ok(located),
    }
}

fn locate_in_jar(path: &Path, release: Option<u16>) -> Result<Option<LocatedModuleInfo>> {
    let mut archive = open_archive(path)?;

    if let Some(bytes) = read_entry(&mut archive, path, MODULE_INFO_CLASS)? {
        return Ok(Some(LocatedModuleInfo {
            entry: MODULE_INFO_CLASS.to_string(),
            bytes,
        }));
    }

    let is_multi_release = read_entry(&mut archive, path, MANIFEST_PATH)?
        .is_some_and(|bytes| Manifest::parse(&String::from_utf8_lossy(&bytes)).is_multi_release());
    if !is_multi_release {
        return Ok(None);
    }

    let upper = release.unwrap_or(u16::MAX);
    let selected = archive
        .file_names()
        .filter_map(versioned_release)
        .filter(|v| (MIN_MODULE_RELEASE..=upper).contains(v))
        .max();

    let Some(version) = selected else {
        debug!(path = %path.display(), ?release, "no versioned module descriptor applies");
        return Ok(None);
    };

    let entry = format!("{VERSIONS_PREFIX}{version}/{MODULE_INFO_CLASS}");
    debug!(path = %path.display(), entry = %entry, "selected multi-release descriptor");
    Ok(read_entry(&mut archive, path, &entry)?.map(|bytes| LocatedModuleInfo { entry, bytes }))
}

/// `META-INF/versions/<v>/module-info.class` → `v`.
fn versioned_release(name: &str) -> Option<u16> {
    name.strip_prefix(VERSIONS_PREFIX)?
        .strip_suffix(MODULE_INFO_CLASS)?
        .strip_suffix('/')?
        .parse()
        .ok()
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    ZipArchive::new(file).map_err(|e| Error::archive(path, e))
}

fn read_entry(archive: &mut ZipArchive<File>, path: &Path, name: &str) -> Result<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut bytes = Vec::with_capacity(capacity_hint(file.size()));
            file.read_to_end(&mut bytes).map_err(|e| Error::io(path, e))?;
            Ok(Some(bytes))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(Error::archive(path, e)),
    }
}

/// The declared size is archive metadata; never trust it past a small bound.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_ENTRY_PREALLOC, |size| size.min(MAX_ENTRY_PREALLOC))
}

/// Locate and parse the descriptor of a path element.
///
/// In [`LocateMode::Lenient`] a `module-info.class` without a `Module`
/// attribute counts as no descriptor, so naming falls through to the
/// manifest. [`LocateMode::Required`] reports it as [`Error::NotAModule`].
pub fn describe_path(
    path: &Path,
    release: Option<u16>,
    mode: LocateMode,
) -> Result<Option<ModuleDescriptor>> {
    let Some(located) = locate_module_info(path, release, mode)? else {
        return Ok(None);
    };
    match classfile::parse_module_descriptor(&located.bytes) {
        Ok(descriptor) => Ok(Some(descriptor)),
        Err(e) if e.is_not_a_module() && mode == LocateMode::Lenient => {
            debug!(path = %path.display(), entry = %located.entry, "descriptor has no Module attribute");
            Ok(None)
        }
        Err(e) => Err(Error::classfile(path, e)),
    }
}

/// Read `META-INF/MANIFEST.MF` from a JAR, JMOD or directory.
pub fn read_manifest(path: &Path) -> Result<Option<Manifest>> {
    let bytes = match artifact_kind(path)? {
        None => None,
        Some(ArtifactKind::Directory) => {
            let file = path.join(MANIFEST_PATH);
            read_if_exists(&file).map_err(|e| Error::io(file, e))?
        }
        Some(ArtifactKind::Jar | ArtifactKind::Jmod) => {
            let mut archive = open_archive(path)?;
            read_entry(&mut archive, path, MANIFEST_PATH)?
        }
    };
    Ok(bytes.map(|bytes| Manifest::parse(&String::from_utf8_lossy(&bytes))))
}
