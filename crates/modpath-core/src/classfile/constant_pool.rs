//! Constant pool decoding (JVMS §4.4).
//!
//! Only the entries the `Module` attribute refers to are interpreted: Utf8,
//! Class, Module and Package. Every other tag is validated for size and
//! skipped. Utf8 payloads are kept as raw bytes and decoded on access.

use super::reader::Reader;
use super::ClassfileError;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

#[derive(Debug, Clone, Copy)]
enum Entry<'a> {
    Utf8(&'a [u8]),
    Class(u16),
    Module(u16),
    Package(u16),
    Other,
    /// Slot 0 and the upper half of a Long/Double.
    Unusable,
}

pub(crate) struct ConstantPool<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> ConstantPool<'a> {
    pub(crate) fn parse(r: &mut Reader<'a>) -> Result<Self, ClassfileError> {
        let count = r.u2()?;
        let mut entries = Vec::with_capacity(usize::from(count));
        entries.push(Entry::Unusable);

        let mut index: u16 = 1;
        while index < count {
            let tag = r.u1()?;
            let entry = match tag {
                TAG_UTF8 => {
                    let len = r.u2()?;
                    Entry::Utf8(r.bytes(usize::from(len))?)
                }
                TAG_CLASS => Entry::Class(r.u2()?),
                TAG_MODULE => Entry::Module(r.u2()?),
                TAG_PACKAGE => Entry::Package(r.u2()?),
                TAG_STRING | TAG_METHOD_TYPE => {
                    r.skip(2)?;
                    Entry::Other
                }
                TAG_METHOD_HANDLE => {
                    r.skip(3)?;
                    Entry::Other
                }
                TAG_INTEGER
                | TAG_FLOAT
                | TAG_FIELDREF
                | TAG_METHODREF
                | TAG_INTERFACE_METHODREF
                | TAG_NAME_AND_TYPE
                | TAG_DYNAMIC
                | TAG_INVOKE_DYNAMIC => {
                    r.skip(4)?;
                    Entry::Other
                }
                TAG_LONG | TAG_DOUBLE => {
                    r.skip(8)?;
                    entries.push(Entry::Other);
                    index = index.saturating_add(1);
                    Entry::Unusable
                }
                _ => return Err(ClassfileError::InvalidConstantTag { index, tag }),
            };
            entries.push(entry);
            index = index.saturating_add(1);
        }

        Ok(Self { entries })
    }

    fn entry(&self, index: u16) -> Result<Entry<'a>, ClassfileError> {
        match self.entries.get(usize::from(index)) {
            None | Some(Entry::Unusable) => Err(ClassfileError::BadConstantIndex(index)),
            Some(entry) => Ok(*entry),
        }
    }

    pub(crate) fn utf8(&self, index: u16) -> Result<String, ClassfileError> {
        match self.entry(index)? {
            Entry::Utf8(bytes) => {
                decode_modified_utf8(bytes).ok_or(ClassfileError::InvalidUtf8(index))
            }
            _ => Err(ClassfileError::BadConstantKind {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Binary class name with `/` replaced by `.`.
    pub(crate) fn class_name(&self, index: u16) -> Result<String, ClassfileError> {
        match self.entry(index)? {
            Entry::Class(name) => Ok(self.utf8(name)?.replace('/', ".")),
            _ => Err(ClassfileError::BadConstantKind {
                index,
                expected: "Class",
            }),
        }
    }

    pub(crate) fn module_name(&self, index: u16) -> Result<String, ClassfileError> {
        match self.entry(index)? {
            Entry::Module(name) => self.utf8(name),
            _ => Err(ClassfileError::BadConstantKind {
                index,
                expected: "Module",
            }),
        }
    }

    /// Package name with `/` replaced by `.`.
    pub(crate) fn package_name(&self, index: u16) -> Result<String, ClassfileError> {
        match self.entry(index)? {
            Entry::Package(name) => Ok(self.utf8(name)?.replace('/', ".")),
            _ => Err(ClassfileError::BadConstantKind {
                index,
                expected: "Package",
            }),
        }
    }
}

/// Decode JVM "modified UTF-8": NUL is encoded as `C0 80` and supplementary
/// characters as surrogate pairs of 3-byte sequences.
fn decode_modified_utf8(bytes: &[u8]) -> Option<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        if b0 & 0x80 == 0 {
            if b0 == 0 {
                return None;
            }
            units.push(u16::from(b0));
            i += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = continuation(bytes, i + 1)?;
            units.push((u16::from(b0 & 0x1F) << 6) | b1);
            i += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = continuation(bytes, i + 1)?;
            let b2 = continuation(bytes, i + 2)?;
            units.push((u16::from(b0 & 0x0F) << 12) | (b1 << 6) | b2);
            i += 3;
        } else {
            return None;
        }
    }
    String::from_utf16(&units).ok()
}

fn continuation(bytes: &[u8], at: usize) -> Option<u16> {
    let b = *bytes.get(at)?;
    (b & 0xC0 == 0x80).then(|| u16::from(b & 0x3F))
}
