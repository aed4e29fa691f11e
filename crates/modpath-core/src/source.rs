//! Module declarations in `module-info.java` source form.

use crate::descriptor::{Modifier, ModuleDescriptor};
use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// Parses a `module-info.java` into a descriptor.
pub trait SourceModuleInfoParser: Send + Sync + fmt::Debug {
    fn parse(&self, path: &Path) -> Result<ModuleDescriptor>;
}

/// Token-level parser for module declarations.
///
/// Handles comments, imports, annotations and every directive of the
/// module declaration grammar. `opens` directives are accepted and dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleInfoSourceParser;

impl SourceModuleInfoParser for ModuleInfoSourceParser {
    fn parse(&self, path: &Path) -> Result<ModuleDescriptor> {
        let text = modpath_util::fs::read_to_string_lossy(path).map_err(|e| Error::io(path, e))?;
        parse_module_declaration(&text).map_err(|message| Error::SourceDescriptor {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Parse the text of a module declaration.
pub fn parse_module_declaration(text: &str) -> std::result::Result<ModuleDescriptor, String> {
    let tokens = tokenize(text)?;
    let mut p = Parser { tokens, pos: 0 };

    while p.peek() == Some("import") {
        p.skip_past(";")?;
    }
    p.skip_annotations()?;
    if p.peek() == Some("open") {
        p.pos += 1;
    }
    p.expect("module")?;
    let name = p.name()?;
    p.expect("{")?;

    let mut builder = ModuleDescriptor::new_module(name);
    loop {
        let Some(keyword) = p.next() else {
            return Err("unexpected end of input, missing }".to_string());
        };
        match keyword.as_str() {
            "}" => break,
            "requires" => {
                let mut modifiers = Vec::new();
                while let Some(modifier) = p.peek().and_then(modifier_keyword) {
                    if p.peek_at(1) == Some(";") {
                        break;
                    }
                    modifiers.push(modifier);
                    p.pos += 1;
                }
                let module = p.name()?;
                p.expect(";")?;
                builder = builder.requires_with(modifiers, module);
            }
            "exports" | "opens" => {
                let package = p.name()?;
                let targets = if p.peek() == Some("to") {
                    p.pos += 1;
                    p.name_list()?
                } else {
                    Vec::new()
                };
                p.expect(";")?;
                if keyword == "exports" {
                    builder = if targets.is_empty() {
                        builder.exports(package)
                    } else {
                        builder.exports_to(package, targets)
                    };
                }
            }
            "uses" => {
                let service = p.name()?;
                p.expect(";")?;
                builder = builder.uses(service);
            }
            "provides" => {
                let service = p.name()?;
                p.expect("with")?;
                let providers = p.name_list()?;
                p.expect(";")?;
                builder = builder.provides(service, providers);
            }
            other => return Err(format!("unexpected '{other}' in module body")),
        }
    }

    builder.build().map_err(|e| e.to_string())
}

fn modifier_keyword(token: &str) -> Option<Modifier> {
    match token {
        "static" => Some(Modifier::Static),
        "transitive" => Some(Modifier::Transitive),
        _ => None,
    }
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&str> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&str> {
        self.tokens.get(self.pos + offset).map(String::as_str)
    }

    fn next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, want: &str) -> std::result::Result<(), String> {
        match self.next() {
            Some(token) if token == want => Ok(()),
            Some(token) => Err(format!("expected '{want}', found '{token}'")),
            None => Err(format!("expected '{want}', found end of input")),
        }
    }

    fn name(&mut self) -> std::result::Result<String, String> {
        match self.next() {
            Some(token) if is_name(&token) => Ok(token),
            Some(token) => Err(format!("expected a name, found '{token}'")),
            None => Err("expected a name, found end of input".to_string()),
        }
    }

    fn name_list(&mut self) -> std::result::Result<Vec<String>, String> {
        let mut names = vec![self.name()?];
        while self.peek() == Some(",") {
            self.pos += 1;
            names.push(self.name()?);
        }
        Ok(names)
    }

    fn skip_past(&mut self, token: &str) -> std::result::Result<(), String> {
        while let Some(t) = self.next() {
            if t == token {
                return Ok(());
            }
        }
        Err(format!("missing '{token}'"))
    }

    /// `@Name` or `@Name(...)`, repeated.
    fn skip_annotations(&mut self) -> std::result::Result<(), String> {
        while self.peek() == Some("@") {
            self.pos += 1;
            self.name()?;
            if self.peek() == Some("(") {
                let mut depth = 0usize;
                loop {
                    match self.next().as_deref() {
                        Some("(") => depth += 1,
                        Some(")") => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        Some(_) => {}
                        None => return Err("unterminated annotation".to_string()),
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

fn is_name(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && token.chars().all(is_name_char)
}

/// Split into names and single-character punctuation, dropping comments and
/// string literals.
fn tokenize(text: &str) -> std::result::Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                loop {
                    match chars.next() {
                        Some('/') if prev == '*' => break,
                        Some(c) => prev = c,
                        None => return Err("unterminated comment".to_string()),
                    }
                }
            }
            '"' | '\'' => {
                let quote = c;
                loop {
                    match chars.next() {
                        Some('\\') => {
                            chars.next();
                        }
                        Some(c) if c == quote => break,
                        Some(_) => {}
                        None => return Err("unterminated literal".to_string()),
                    }
                }
                tokens.push("\"\"".to_string());
            }
            c if is_name_char(c) => {
                let mut name = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !is_name_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                tokens.push(name);
            }
            c => tokens.push(c.to_string()),
        }
    }

    Ok(tokens)
}
