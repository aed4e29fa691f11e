//! Reader for the Java `.properties` text format, as written by
//! `java.util.Properties#store`.

use indexmap::IndexMap;

/// Parse properties text into key/value pairs. Later keys replace earlier
/// ones.
#[must_use]
pub fn parse_properties(text: &str) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    let mut lines = text.lines();

    while let Some(first) = lines.next() {
        let trimmed = first.trim_start_matches([' ', '\t', '\x0c']);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = String::from(trimmed);
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start_matches([' ', '\t', '\x0c'])),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        out.insert(unescape(key), unescape(value));
    }

    out
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    let rest = rest
        .strip_prefix(['=', ':'])
        .unwrap_or(rest)
        .trim_start_matches([' ', '\t', '\x0c']);
    (key, rest)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str(&hex),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_output() {
        let text = "#\n#Mon Jan 01 00:00:00 UTC 2024\n/opt/lib/a.jar=org.example.a\n/opt/lib/b-1.0.jar=b\n";
        let props = parse_properties(text);
        assert_eq!(props.len(), 2);
        assert_eq!(props["/opt/lib/a.jar"], "org.example.a");
        assert_eq!(props["/opt/lib/b-1.0.jar"], "b");
    }

    #[test]
    fn test_escaped_separators_in_key() {
        let props = parse_properties("C\\:\\\\lib\\\\my\\ app.jar=my.app\n");
        assert_eq!(props["C:\\lib\\my app.jar"], "my.app");
    }

    #[test]
    fn test_separator_variants() {
        let props = parse_properties("a = 1\nb:2\nc 3\n! comment\n   d\t=\t4\n");
        assert_eq!(props["a"], "1");
        assert_eq!(props["b"], "2");
        assert_eq!(props["c"], "3");
        assert_eq!(props["d"], "4");
        assert_eq!(props.len(), 4);
    }

    #[test]
    fn test_continuation_and_unicode() {
        let props = parse_properties("key=org.exam\\\n    ple.mod\nname=caf\\u00e9\n");
        assert_eq!(props["key"], "org.example.mod");
        assert_eq!(props["name"], "café");
    }

    #[test]
    fn test_even_backslashes_do_not_continue() {
        let props = parse_properties("a=x\\\\\nb=y\n");
        assert_eq!(props["a"], "x\\");
        assert_eq!(props["b"], "y");
    }
}
