#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Module path / classpath classification for JVM build artifacts.
//!
//! Given a main module and a list of directories, JARs and JMODs, decide
//! which elements belong on `--module-path` and which on `--class-path`.

pub mod classfile;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod locate;
pub mod names;
pub mod platform;
pub mod resolve;
pub mod source;
pub mod source_path;
pub mod version;

pub use classfile::{parse_module_info, ClassfileError, ClassfileVersion, JavaVersion, ModuleInfo};
pub use config::{Config, NameExtractorConfig};
pub use descriptor::{DescriptorError, Exports, Modifier, ModuleDescriptor, Provides, Requires};
pub use error::{Error, ErrorInfo, Result};
pub use locate::{describe_path, locate_module_info, read_manifest, LocateMode, LocatedModuleInfo, Manifest};
pub use names::{
    FilenameModuleNameExtractor, ManifestModuleNameExtractor, ModuleNameSource,
    ModuleNamesExtractor, ProcessModuleNameExtractor,
};
pub use resolve::{
    LocationManager, MainDescriptor, ResolvePathRequest, ResolvePathResult, ResolvePathsRequest,
    ResolvePathsResult,
};
pub use source::{ModuleInfoSourceParser, SourceModuleInfoParser};
pub use source_path::{expand, expand_braces};
pub use version::{RESOLVE_SCHEMA_VERSION, VERSION};
