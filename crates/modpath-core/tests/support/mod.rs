//! Fixture helpers: a minimal class-file assembler for `module-info.class`
//! and writers for JAR/JMOD/directory artifacts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ACC_TRANSITIVE: u16 = 0x0020;
pub const ACC_STATIC_PHASE: u16 = 0x0040;
pub const ACC_MANDATED: u16 = 0x8000;

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    next: u16,
    utf8: HashMap<String, u16>,
    refs: HashMap<(u8, String), u16>,
}

impl Pool {
    fn new() -> Self {
        Self {
            next: 1,
            ..Default::default()
        }
    }

    fn utf8(&mut self, s: &str) -> u16 {
        if let Some(&index) = self.utf8.get(s) {
            return index;
        }
        let index = self.next;
        self.bytes.push(1);
        self.bytes
            .extend_from_slice(&u16::try_from(s.len()).unwrap().to_be_bytes());
        self.bytes.extend_from_slice(s.as_bytes());
        self.next += 1;
        self.utf8.insert(s.to_string(), index);
        index
    }

    fn named(&mut self, tag: u8, name: &str) -> u16 {
        let key = (tag, name.to_string());
        if let Some(&index) = self.refs.get(&key) {
            return index;
        }
        let name_index = self.utf8(name);
        let index = self.next;
        self.bytes.push(tag);
        self.bytes.extend_from_slice(&name_index.to_be_bytes());
        self.next += 1;
        self.refs.insert(key, index);
        index
    }

    fn class(&mut self, dotted: &str) -> u16 {
        self.named(7, &dotted.replace('.', "/"))
    }

    fn module(&mut self, name: &str) -> u16 {
        self.named(19, name)
    }

    fn package(&mut self, dotted: &str) -> u16 {
        self.named(20, &dotted.replace('.', "/"))
    }

    /// A Long constant, occupying two slots.
    fn long(&mut self, value: i64) -> u16 {
        let index = self.next;
        self.bytes.push(5);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self.next += 2;
        index
    }

    /// A NameAndType, MethodHandle and Integer, so readers see sized
    /// entries they must skip.
    fn noise(&mut self) {
        let name = self.utf8("run");
        let desc = self.utf8("()V");
        self.bytes.push(12);
        self.bytes.extend_from_slice(&name.to_be_bytes());
        self.bytes.extend_from_slice(&desc.to_be_bytes());
        let nat = self.next;
        self.next += 1;

        self.bytes.push(15);
        self.bytes.push(6);
        self.bytes.extend_from_slice(&nat.to_be_bytes());
        self.next += 1;

        self.bytes.push(3);
        self.bytes.extend_from_slice(&42i32.to_be_bytes());
        self.next += 1;
    }
}

fn u2(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn u2_len(out: &mut Vec<u8>, len: usize) {
    u2(out, u16::try_from(len).unwrap());
}

/// Assembles a `module-info.class`.
#[derive(Clone)]
pub struct ModuleInfoClass {
    name: String,
    major: u16,
    requires: Vec<(String, u16)>,
    exports: Vec<(String, Vec<String>)>,
    opens: Vec<(String, Vec<String>)>,
    uses: Vec<String>,
    provides: Vec<(String, Vec<String>)>,
    with_noise: bool,
}

impl ModuleInfoClass {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            major: 53,
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
            with_noise: false,
        }
    }

    pub fn major(mut self, major: u16) -> Self {
        self.major = major;
        self
    }

    pub fn requires(self, name: &str) -> Self {
        self.requires_flags(name, 0)
    }

    pub fn requires_flags(mut self, name: &str, flags: u16) -> Self {
        self.requires.push((name.to_string(), flags));
        self
    }

    pub fn exports(mut self, package: &str) -> Self {
        self.exports.push((package.to_string(), Vec::new()));
        self
    }

    pub fn exports_to(mut self, package: &str, targets: &[&str]) -> Self {
        self.exports.push((
            package.to_string(),
            targets.iter().map(|t| (*t).to_string()).collect(),
        ));
        self
    }

    pub fn opens(mut self, package: &str, targets: &[&str]) -> Self {
        self.opens.push((
            package.to_string(),
            targets.iter().map(|t| (*t).to_string()).collect(),
        ));
        self
    }

    pub fn uses(mut self, service: &str) -> Self {
        self.uses.push(service.to_string());
        self
    }

    pub fn provides(mut self, service: &str, providers: &[&str]) -> Self {
        self.provides.push((
            service.to_string(),
            providers.iter().map(|p| (*p).to_string()).collect(),
        ));
        self
    }

    /// Add unrelated constants (Long, NameAndType, MethodHandle, Integer).
    pub fn with_noise(mut self) -> Self {
        self.with_noise = true;
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut pool = Pool::new();
        if self.with_noise {
            pool.long(7);
            pool.noise();
        }
        let this_class = pool.class("module-info");
        let attr_name = pool.utf8("Module");

        let mut body = Vec::new();
        u2(&mut body, pool.module(&self.name));
        u2(&mut body, 0);
        u2(&mut body, 0);

        u2_len(&mut body, self.requires.len());
        for (name, flags) in &self.requires {
            u2(&mut body, pool.module(name));
            u2(&mut body, *flags);
            u2(&mut body, 0);
        }

        for directives in [&self.exports, &self.opens] {
            u2_len(&mut body, directives.len());
            for (package, targets) in directives {
                u2(&mut body, pool.package(package));
                u2(&mut body, 0);
                u2_len(&mut body, targets.len());
                for target in targets {
                    u2(&mut body, pool.module(target));
                }
            }
        }

        u2_len(&mut body, self.uses.len());
        for service in &self.uses {
            u2(&mut body, pool.class(service));
        }

        u2_len(&mut body, self.provides.len());
        for (service, providers) in &self.provides {
            u2(&mut body, pool.class(service));
            u2_len(&mut body, providers.len());
            for provider in providers {
                u2(&mut body, pool.class(provider));
            }
        }

        let source_file = pool.utf8("SourceFile");
        let source_name = pool.utf8("module-info.java");

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
        u2(&mut out, 0);
        u2(&mut out, self.major);
        u2(&mut out, pool.next);
        out.extend_from_slice(&pool.bytes);
        u2(&mut out, 0x8000);
        u2(&mut out, this_class);
        u2(&mut out, 0);
        u2(&mut out, 0);
        u2(&mut out, 0);
        u2(&mut out, 0);

        u2(&mut out, 2);
        u2(&mut out, source_file);
        out.extend_from_slice(&2u32.to_be_bytes());
        u2(&mut out, source_name);
        u2(&mut out, attr_name);
        out.extend_from_slice(&u32::try_from(body.len()).unwrap().to_be_bytes());
        out.extend_from_slice(&body);
        out
    }
}

/// An ordinary class with a field, a method and a `SourceFile` attribute,
/// but no `Module` attribute.
pub fn plain_class_bytes() -> Vec<u8> {
    let mut pool = Pool::new();
    let this_class = pool.class("org.example.Widget");
    let super_class = pool.class("java.lang.Object");
    let iface = pool.class("java.io.Serializable");
    let field_name = pool.utf8("size");
    let field_desc = pool.utf8("I");
    let method_name = pool.utf8("run");
    let method_desc = pool.utf8("()V");
    let code = pool.utf8("Code");
    let source_file = pool.utf8("SourceFile");
    let source_name = pool.utf8("Widget.java");

    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
    u2(&mut out, 0);
    u2(&mut out, 61);
    u2(&mut out, pool.next);
    out.extend_from_slice(&pool.bytes);
    u2(&mut out, 0x0021);
    u2(&mut out, this_class);
    u2(&mut out, super_class);
    u2(&mut out, 1);
    u2(&mut out, iface);

    u2(&mut out, 1);
    u2(&mut out, 0x0002);
    u2(&mut out, field_name);
    u2(&mut out, field_desc);
    u2(&mut out, 0);

    u2(&mut out, 1);
    u2(&mut out, 0x0001);
    u2(&mut out, method_name);
    u2(&mut out, method_desc);
    u2(&mut out, 1);
    u2(&mut out, code);
    let code_body = [0u8, 1, 0, 1, 0, 0, 0, 1, 0xB1, 0, 0, 0, 0];
    out.extend_from_slice(&u32::try_from(code_body.len()).unwrap().to_be_bytes());
    out.extend_from_slice(&code_body);

    u2(&mut out, 1);
    u2(&mut out, source_file);
    out.extend_from_slice(&2u32.to_be_bytes());
    u2(&mut out, source_name);
    out
}

/// Write a zip archive with the given entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// Manifest text with the given main attributes.
pub fn manifest(attributes: &[(&str, &str)]) -> Vec<u8> {
    let mut text = String::from("Manifest-Version: 1.0\r\n");
    for (key, value) in attributes {
        text.push_str(&format!("{key}: {value}\r\n"));
    }
    text.push_str("\r\n");
    text.into_bytes()
}

/// A modular JAR.
pub fn modular_jar(dir: &Path, file: &str, module: &ModuleInfoClass) -> PathBuf {
    let path = dir.join(file);
    write_zip(
        &path,
        &[
            ("META-INF/MANIFEST.MF", &manifest(&[])[..]),
            ("module-info.class", &module.bytes()[..]),
        ],
    );
    path
}

/// A JAR with only a manifest (and a class), optionally naming the module.
pub fn plain_jar(dir: &Path, file: &str, automatic_name: Option<&str>) -> PathBuf {
    let path = dir.join(file);
    let attributes: Vec<(&str, &str)> = automatic_name
        .map(|name| vec![("Automatic-Module-Name", name)])
        .unwrap_or_default();
    write_zip(
        &path,
        &[
            ("META-INF/MANIFEST.MF", &manifest(&attributes)[..]),
            ("org/example/Widget.class", &plain_class_bytes()[..]),
        ],
    );
    path
}

/// An exploded output directory with a compiled descriptor.
pub fn module_dir(dir: &Path, name: &str, module: &ModuleInfoClass) -> PathBuf {
    let path = dir.join(name);
    std::fs::create_dir_all(&path).unwrap();
    std::fs::write(path.join("module-info.class"), module.bytes()).unwrap();
    path
}

/// A JMOD-style archive with the descriptor under `classes/`.
pub fn jmod(dir: &Path, file: &str, module: &ModuleInfoClass) -> PathBuf {
    let path = dir.join(file);
    write_zip(&path, &[("classes/module-info.class", &module.bytes()[..])]);
    path
}
