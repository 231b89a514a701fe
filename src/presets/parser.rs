// src/presets/parser.rs

use crate::error::ConfigError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Key/value pairs grouped by `[section]`. Keys are stored lowercase, so
/// lookups are case-insensitive ("He", "HE" and "he" are the same key).
#[derive(Debug, Default, Clone)]
pub struct Sections {
    sections: HashMap<String, HashMap<String, String>>,
}

impl Sections {
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(&key.to_lowercase())
            .map(String::as_str)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }
}

pub fn read(path: &Path) -> Result<Sections, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

/// Parses `[section]` headers and `key = value` / `key: value` lines.
/// Blank lines and lines starting with `#` or `;` are ignored.
pub fn parse(text: &str, path: &Path) -> Result<Sections, ConfigError> {
    let mut out = Sections::default();
    let mut current: Option<String> = None;

    for (n, raw) in text.lines().enumerate() {
        let line_no = n + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        // 1. Section header
        if line.starts_with('[') {
            let name = line
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ConfigError::malformed(path, line_no, format!("bad section header '{}'", line)))?;
            out.sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        // 2. Key/value (first '=' or ':' wins)
        let split = line.find(|c: char| c == '=' || c == ':');
        let (key, value) = match split {
            Some(idx) => (line[..idx].trim(), line[idx + 1..].trim()),
            None => {
                return Err(ConfigError::malformed(path, line_no, format!("expected 'key = value', found '{}'", line)))
            }
        };
        if key.is_empty() {
            return Err(ConfigError::malformed(path, line_no, "empty key"));
        }

        let section = current
            .as_ref()
            .ok_or_else(|| ConfigError::malformed(path, line_no, "key outside of any [section]"))?;
        out.sections
            .entry(section.clone())
            .or_default()
            .insert(key.to_lowercase(), value.to_string());
    }

    Ok(out)
}
