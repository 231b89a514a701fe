// src/presets/mod.rs
// Element property table: named radius and color presets loaded from the
// resource directory, one file per preset (`*.radii`, `*.colors`).

pub mod parser;

use crate::error::ConfigError;
use crate::model::elements::ALL_ELEMENTS;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// --- Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresetKind {
    Radii,
    Colors,
}

impl PresetKind {
    /// File extension the preset files of this kind are discovered by.
    pub fn extension(self) -> &'static str {
        match self {
            PresetKind::Radii => "radii",
            PresetKind::Colors => "colors",
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

/// One named preset. Every catalog element has a raw value: either its own
/// entry from `[elements]` or the preset's `default_value`.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: String,
    pub kind: PresetKind,
    pub default_value: String,
    pub source: Option<PathBuf>,
    values: BTreeMap<&'static str, String>,
}

impl Preset {
    /// Builds a preset from explicit entries; absent catalog elements get `default_value`.
    pub fn new(
        name: impl Into<String>,
        kind: PresetKind,
        default_value: impl Into<String>,
        entries: &[(&str, &str)],
    ) -> Self {
        let default_value = default_value.into();
        let values = ALL_ELEMENTS
            .iter()
            .map(|&el| {
                let value = entries
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(el))
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_else(|| default_value.clone());
                (el, value)
            })
            .collect();
        Self {
            name: name.into(),
            kind,
            default_value,
            source: None,
            values,
        }
    }

    /// Reads a preset file: `[options]` with `name` and `default_value`,
    /// `[elements]` with symbol = value.
    pub fn from_file(path: &Path, kind: PresetKind) -> Result<Self, ConfigError> {
        let sections = parser::read(path)?;

        let name = sections
            .get("options", "name")
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConfigError::malformed(path, 0, "missing [options] name"))?;
        let default_value = sections
            .get("options", "default_value")
            .ok_or_else(|| ConfigError::malformed(path, 0, "missing [options] default_value"))?;

        let values = ALL_ELEMENTS
            .iter()
            .map(|&el| {
                let value = sections.get("elements", el).unwrap_or(default_value);
                (el, value.to_string())
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            kind,
            default_value: default_value.to_string(),
            source: Some(path.to_path_buf()),
            values,
        })
    }

    fn raw(&self, element: &str) -> Result<&str, ConfigError> {
        self.values
            .get(element)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::UnknownElement {
                element: element.to_string(),
            })
    }

    fn invalid(&self, element: &str, value: &str) -> ConfigError {
        ConfigError::InvalidValue {
            kind: self.kind.to_string(),
            preset: self.name.clone(),
            element: element.to_string(),
            value: value.to_string(),
        }
    }

    pub fn radius(&self, element: &str) -> Result<f64, ConfigError> {
        let raw = self.raw(element)?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| self.invalid(element, raw))
    }

    pub fn color(&self, element: &str) -> Result<Rgb, ConfigError> {
        let raw = self.raw(element)?;
        let parts: Vec<u8> = raw
            .trim()
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| self.invalid(element, raw))?;
        match parts.as_slice() {
            [r, g, b] => Ok(Rgb(*r, *g, *b)),
            _ => Err(self.invalid(element, raw)),
        }
    }
}

// --- Library ---

/// All presets discovered at configuration-load time, by kind and name.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    radii: BTreeMap<String, Preset>,
    colors: BTreeMap<String, Preset>,
}

impl PresetLibrary {
    /// Discovers every `*.radii` and `*.colors` file in `dir`.
    ///
    /// Files that cannot be parsed are skipped with a warning; a directory
    /// without at least one preset of each kind is an error.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        if !dir.is_dir() {
            return Err(ConfigError::MissingResourceDir(dir.to_path_buf()));
        }

        let mut lib = Self::default();
        for kind in [PresetKind::Radii, PresetKind::Colors] {
            for path in discover(dir, kind)? {
                match Preset::from_file(&path, kind) {
                    Ok(preset) => {
                        debug!("Loaded {} preset '{}' from {:?}", kind, preset.name, path);
                        lib.insert(preset);
                    }
                    Err(e) => warn!("Skipping preset file: {}", e),
                }
            }
            if lib.names(kind).is_empty() {
                return Err(ConfigError::NoPresets {
                    kind: kind.to_string(),
                    dir: dir.to_path_buf(),
                });
            }
        }

        info!(
            "Presets: radii [{}], colors [{}]",
            lib.names(PresetKind::Radii).join(", "),
            lib.names(PresetKind::Colors).join(", ")
        );
        Ok(lib)
    }

    /// Adds a preset; a later preset with the same name replaces the earlier one.
    pub fn insert(&mut self, preset: Preset) {
        let map = match preset.kind {
            PresetKind::Radii => &mut self.radii,
            PresetKind::Colors => &mut self.colors,
        };
        if let Some(old) = map.get(&preset.name) {
            warn!(
                "{} preset '{}' from {:?} replaced by {:?}",
                preset.kind, preset.name, old.source, preset.source
            );
        }
        map.insert(preset.name.clone(), preset);
    }

    /// Preset names of a kind, sorted, for user selection.
    pub fn names(&self, kind: PresetKind) -> Vec<&str> {
        let map = match kind {
            PresetKind::Radii => &self.radii,
            PresetKind::Colors => &self.colors,
        };
        map.keys().map(String::as_str).collect()
    }

    pub fn preset(&self, kind: PresetKind, name: &str) -> Result<&Preset, ConfigError> {
        let map = match kind {
            PresetKind::Radii => &self.radii,
            PresetKind::Colors => &self.colors,
        };
        map.get(name).ok_or_else(|| ConfigError::UnknownPreset {
            kind: kind.to_string(),
            name: name.to_string(),
        })
    }

    /// Radius of `element` in preset `set`, in the preset's own unit (pm for the bundled files).
    pub fn radius(&self, set: &str, element: &str) -> Result<f64, ConfigError> {
        self.preset(PresetKind::Radii, set)?.radius(element)
    }

    pub fn color(&self, set: &str, element: &str) -> Result<Rgb, ConfigError> {
        self.preset(PresetKind::Colors, set)?.color(element)
    }

    /// Fails early when either preset name is unknown.
    pub fn check(&self, radii_set: &str, colors_set: &str) -> Result<(), ConfigError> {
        self.preset(PresetKind::Radii, radii_set)?;
        self.preset(PresetKind::Colors, colors_set)?;
        Ok(())
    }
}

fn discover(dir: &Path, kind: PresetKind) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(kind.extension()))
        .collect();
    // Directory order is platform dependent.
    paths.sort();
    Ok(paths)
}
