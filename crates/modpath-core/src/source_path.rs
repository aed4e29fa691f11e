//! Brace expansion for `--module-source-path` segments.
//!
//! `src/{main,test}/java` expands to `src/main/java` and `src/test/java`.
//! Groups nest and alternatives may be empty.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BraceError {
    #[error("Unbalanced braces, missing }}")]
    MissingClose,
    #[error("Unbalanced braces, missing {{")]
    MissingOpen,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse {segment}: {source}")]
pub struct ExpandError {
    pub segment: String,
    #[source]
    pub source: BraceError,
}

#[derive(Debug)]
enum Part {
    Literal(String),
    Group(Vec<Vec<Part>>),
}

/// Expand every brace group in one segment.
pub fn expand_braces(segment: &str) -> Result<Vec<String>, BraceError> {
    let mut chars = segment.chars();
    let (parts, _) = parse_sequence(&mut chars, false)?;
    Ok(expand_parts(&parts, vec![String::new()]))
}

/// Expand a list of segments, in order.
pub fn expand<S: AsRef<str>>(segments: &[S]) -> Result<Vec<String>, ExpandError> {
    let mut out = Vec::new();
    for segment in segments {
        let segment = segment.as_ref();
        let expanded = expand_braces(segment).map_err(|source| ExpandError {
            segment: segment.to_string(),
            source,
        })?;
        out.extend(expanded);
    }
    Ok(out)
}

/// Parse up to the end of input or, inside a group, up to `,` or `}`.
/// Returns the terminator that stopped the sequence.
fn parse_sequence(
    chars: &mut std::str::Chars<'_>,
    in_group: bool,
) -> Result<(Vec<Part>, Option<char>), BraceError> {
    let mut parts = Vec::new();
    let mut literal = String::new();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if !literal.is_empty() {
                    parts.push(Part::Literal(std::mem::take(&mut literal)));
                }
                let mut alternatives = Vec::new();
                loop {
                    let (alternative, terminator) = parse_sequence(chars, true)?;
                    alternatives.push(alternative);
                    match terminator {
                        Some(',') => continue,
                        Some(_) => break,
                        None => return Err(BraceError::MissingClose),
                    }
                }
                parts.push(Part::Group(alternatives));
            }
            ',' | '}' if in_group => {
                if !literal.is_empty() {
                    parts.push(Part::Literal(literal));
                }
                return Ok((parts, Some(c)));
            }
            '}' => return Err(BraceError::MissingOpen),
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    Ok((parts, None))
}

fn expand_parts(parts: &[Part], bases: Vec<String>) -> Vec<String> {
    parts.iter().fold(bases, |bases, part| match part {
        Part::Literal(text) => bases.into_iter().map(|b| b + text).collect(),
        Part::Group(alternatives) => alternatives
            .iter()
            .flat_map(|alt| expand_parts(alt, bases.clone()))
            .collect(),
    })
}
