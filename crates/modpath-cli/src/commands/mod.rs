pub mod classfile_version;
pub mod describe;
pub mod expand;
pub mod resolve;
pub mod version;
