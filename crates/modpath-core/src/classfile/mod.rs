//! JVM class-file parsing, limited to what module resolution needs.
//!
//! [`parse_module_info`] walks a class file far enough to find the `Module`
//! attribute of a compiled `module-info.class` and turns it into a
//! [`ModuleDescriptor`]. Everything else in the class body (fields, methods,
//! other attributes) is length-checked and skipped.

mod constant_pool;
mod module_attr;
mod reader;
mod version;

pub use version::{ClassfileVersion, JavaVersion, MIN_MAJOR};

use crate::descriptor::{DescriptorError, ModuleDescriptor};
use constant_pool::ConstantPool;
use reader::Reader;
use thiserror::Error;

/// Class-file magic number.
pub const MAGIC: u32 = 0xCAFE_BABE;

const MODULE_ATTRIBUTE: &str = "Module";

/// Errors raised while decoding a class file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassfileError {
    #[error("bad magic number 0x{0:08X}")]
    BadMagic(u32),

    #[error("unsupported class file major version {0}")]
    UnsupportedVersion(u16),

    #[error("unexpected end of data at offset {offset} (needed {needed} bytes)")]
    Truncated { offset: usize, needed: usize },

    #[error("constant pool index {0} is out of range")]
    BadConstantIndex(u16),

    #[error("constant pool entry {index} is not a {expected}")]
    BadConstantKind { index: u16, expected: &'static str },

    #[error("invalid modified UTF-8 in constant pool entry {0}")]
    InvalidUtf8(u16),

    #[error("invalid constant pool tag {tag} at index {index}")]
    InvalidConstantTag { index: u16, tag: u8 },

    #[error("attribute {name} declares {declared} bytes but {actual} were read")]
    AttributeLength {
        name: String,
        declared: u32,
        actual: usize,
    },

    #[error("class file has no Module attribute")]
    NotAModule,

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

impl ClassfileError {
    /// Well-formed class file that simply is not a module descriptor.
    #[must_use]
    pub fn is_not_a_module(&self) -> bool {
        matches!(self, Self::NotAModule)
    }
}

/// A decoded `module-info.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub descriptor: ModuleDescriptor,
    pub version: ClassfileVersion,
}

/// Parse a compiled module descriptor.
///
/// # Errors
/// [`ClassfileError::NotAModule`] when the class has no `Module` attribute;
/// any other variant means the bytes are not a valid class file.
pub fn parse_module_info(bytes: &[u8]) -> Result<ModuleInfo, ClassfileError> {
    let mut r = Reader::new(bytes);

    let magic = r.u4()?;
    if magic != MAGIC {
        return Err(ClassfileError::BadMagic(magic));
    }
    let minor = r.u2()?;
    let major = r.u2()?;
    let version = ClassfileVersion::new(major, minor)?;

    let pool = ConstantPool::parse(&mut r)?;

    // access_flags, this_class, super_class
    r.skip(6)?;
    let interfaces = r.u2()?;
    r.skip(usize::from(interfaces) * 2)?;

    // fields, then methods
    for _ in 0..2 {
        for _ in 0..r.u2()? {
            r.skip(6)?;
            skip_attributes(&mut r)?;
        }
    }

    for _ in 0..r.u2()? {
        let name_index = r.u2()?;
        let length = r.u4()?;
        let body = r.bytes(length as usize)?;
        if pool.utf8(name_index)? != MODULE_ATTRIBUTE {
            continue;
        }

        let mut attr = Reader::new(body);
        let descriptor = module_attr::decode(&mut attr, &pool)?;
        if attr.position() != body.len() {
            return Err(ClassfileError::AttributeLength {
                name: MODULE_ATTRIBUTE.to_string(),
                declared: length,
                actual: attr.position(),
            });
        }
        return Ok(ModuleInfo {
            descriptor,
            version,
        });
    }

    Err(ClassfileError::NotAModule)
}

/// Parse a compiled module descriptor, discarding the class-file version.
pub fn parse_module_descriptor(bytes: &[u8]) -> Result<ModuleDescriptor, ClassfileError> {
    parse_module_info(bytes).map(|info| info.descriptor)
}

fn skip_attributes(r: &mut Reader<'_>) -> Result<(), ClassfileError> {
    for _ in 0..r.u2()? {
        r.skip(2)?;
        let length = r.u4()?;
        r.skip(length as usize)?;
    }
    Ok(())
}
