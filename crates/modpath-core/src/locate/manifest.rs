//! JAR manifest main section.

/// Location of the manifest inside a JAR or an exploded directory.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

pub const AUTOMATIC_MODULE_NAME: &str = "Automatic-Module-Name";
pub const MULTI_RELEASE: &str = "Multi-Release";

/// Main attributes of a `META-INF/MANIFEST.MF`.
///
/// Per-entry sections after the first blank line are not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Vec<(String, String)>,
}

impl Manifest {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut main: Vec<(String, String)> = Vec::new();

        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }
            if let Some(rest) = line.strip_prefix(' ') {
                if let Some((_, value)) = main.last_mut() {
                    value.push_str(rest);
                }
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                let value = value.strip_prefix(' ').unwrap_or(value);
                main.push((key.trim().to_string(), value.to_string()));
            }
        }

        Self { main }
    }

    /// Look up a main attribute; keys compare case-insensitively.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.main
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// `Automatic-Module-Name`, if present and not blank.
    #[must_use]
    pub fn automatic_module_name(&self) -> Option<&str> {
        self.get(AUTOMATIC_MODULE_NAME)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// `Multi-Release: true`, value compared case-insensitively.
    #[must_use]
    pub fn is_multi_release(&self) -> bool {
        self.get(MULTI_RELEASE)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    pub fn main_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.main.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
