//! Class-file and Java platform versions.

use super::{ClassfileError, MAGIC};
use crate::error::{Error, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Lowest major version ever emitted (JDK 1.1).
pub const MIN_MAJOR: u16 = 45;
const PREVIEW_MINOR: u16 = 0xFFFF;

/// `major.minor` version from a class-file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClassfileVersion {
    major: u16,
    minor: u16,
}

impl ClassfileVersion {
    /// # Errors
    /// [`ClassfileError::UnsupportedVersion`] for a major version below 45.
    pub fn new(major: u16, minor: u16) -> std::result::Result<Self, ClassfileError> {
        if major < MIN_MAJOR {
            return Err(ClassfileError::UnsupportedVersion(major));
        }
        Ok(Self { major, minor })
    }

    /// Read the version from the first eight bytes of a class file.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, ClassfileError> {
        let mut r = super::reader::Reader::new(bytes);
        let magic = r.u4()?;
        if magic != MAGIC {
            return Err(ClassfileError::BadMagic(magic));
        }
        let minor = r.u2()?;
        let major = r.u2()?;
        Self::new(major, minor)
    }

    /// Read the version of a class file on disk. Only the header is read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut header = Vec::with_capacity(8);
        std::fs::File::open(path)
            .and_then(|f| f.take(8).read_to_end(&mut header))
            .map_err(|e| Error::io(path, e))?;
        Self::from_bytes(&header).map_err(|e| Error::classfile(path, e))
    }

    #[must_use]
    pub fn major(&self) -> u16 {
        self.major
    }

    #[must_use]
    pub fn minor(&self) -> u16 {
        self.minor
    }

    /// Compiled with `--enable-preview`.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.minor == PREVIEW_MINOR
    }

    /// Java platform version this class file targets, e.g. `1.8` or `21`.
    #[must_use]
    pub fn java_version(&self) -> JavaVersion {
        let feature = self.major - (MIN_MAJOR - 1);
        if feature < 9 {
            JavaVersion::parse(&format!("1.{feature}"))
        } else {
            JavaVersion::parse(&feature.to_string())
        }
    }
}

impl fmt::Display for ClassfileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} (Java {})",
            self.major,
            self.minor,
            self.java_version()
        )
    }
}

/// A Java version string compared by its numeric segments.
///
/// `1.3.0_01` has the update number as a fourth segment and anything after
/// `-` (as in `9-ea`) marks a pre-release that sorts before the release.
/// The raw text is kept for display.
#[derive(Debug, Clone)]
pub struct JavaVersion {
    raw: String,
    segments: Vec<u64>,
    pre_release: bool,
}

impl JavaVersion {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (numbers, qualifier) = match trimmed.split_once('-') {
            Some((numbers, qualifier)) => (numbers, Some(qualifier)),
            None => (trimmed, None),
        };
        let segments = numbers
            .split(['.', '_'])
            .map_while(leading_number)
            .collect();

        Self {
            raw: raw.to_string(),
            segments,
            pre_release: qualifier.is_some(),
        }
    }

    /// Feature release number: `8` for `1.8.0_292`, `17` for `17.0.2`.
    #[must_use]
    pub fn feature(&self) -> Option<u64> {
        match self.segments.as_slice() {
            [1, second, ..] => Some(*second),
            [first, ..] => Some(*first),
            [] => None,
        }
    }

    #[must_use]
    pub fn is_at_least(&self, other: &JavaVersion) -> bool {
        self >= other
    }

    #[must_use]
    pub fn is_before(&self, other: &JavaVersion) -> bool {
        self < other
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn leading_number(segment: &str) -> Option<u64> {
    let end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    segment[..end].parse().ok()
}

impl Ord for JavaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .cmp(&other.segments)
            .then_with(|| other.pre_release.cmp(&self.pre_release))
    }
}

impl PartialOrd for JavaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for JavaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JavaVersion {}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for JavaVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
