// src/config.rs

use crate::model::params::BuildParams;
use crate::molecule::{BuildSettings, DEFAULT_RADIUS_UNIT_DIVISOR};
use crate::physics::neighbors::CutoffOptions;
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Install location of the bundled presets (see package.metadata.deb).
const SYSTEM_RESOURCE_DIR: &str = "/usr/share/molforge/resources";

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl LogLevel {
  pub fn filter(self) -> LevelFilter {
    match self {
      LogLevel::Error => LevelFilter::Error,
      LogLevel::Warn => LevelFilter::Warn,
      LogLevel::Info => LevelFilter::Info,
      LogLevel::Debug => LevelFilter::Debug,
      LogLevel::Trace => LevelFilter::Trace,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  /// Directory holding `*.radii` and `*.colors` presets.
  #[serde(default)]
  pub resource_dir: Option<PathBuf>,

  /// Parameters used when the command line does not override them.
  #[serde(default)]
  pub defaults: BuildParams,

  #[serde(default)]
  pub cutoff: CutoffOptions,

  #[serde(default = "default_divisor")]
  pub radius_unit_divisor: f64,

  #[serde(default = "default_log_level")]
  pub log_level: LogLevel,
}

fn default_divisor() -> f64 {
  DEFAULT_RADIUS_UNIT_DIVISOR
}

fn default_log_level() -> LogLevel {
  LogLevel::Info
}

impl Default for Config {
  fn default() -> Self {
    Self {
      resource_dir: None,
      defaults: BuildParams::default(),
      cutoff: CutoffOptions::default(),
      radius_unit_divisor: default_divisor(),
      log_level: default_log_level(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/molforge/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  /// Falls back to defaults on any problem; the message says what happened.
  pub fn load_from(path: &Path) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader::<_, Config>(reader) {
            Ok(mut cfg) => match cfg.cutoff.validate() {
              Ok(()) => (cfg, format!("Config loaded from {:?}", path)),
              Err(e) => {
                cfg.cutoff = CutoffOptions::default();
                (cfg, format!("Config loaded from {:?}; {}, using default cutoffs", path, e))
              }
            },
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> String {
    self.save_to(&Self::get_path())
  }

  pub fn save_to(&self, path: &Path) -> String {
    if let Some(parent) = path.parent() {
      let _ = fs::create_dir_all(parent);
    }

    match File::create(path) {
      Ok(file) => {
        let writer = BufWriter::new(file);
        match serde_json::to_writer_pretty(writer, self) {
          Ok(_) => format!("Config saved to {:?}", path),
          Err(e) => format!("Failed to save config: {}", e),
        }
      }
      Err(e) => format!("Could not create config file: {}", e),
    }
  }

  /// Neighbor and unit settings handed to every build.
  pub fn build_settings(&self) -> BuildSettings {
    BuildSettings {
      cutoff: self.cutoff,
      radius_unit_divisor: self.radius_unit_divisor,
    }
  }

  /// Preset directory: the configured one, else the first existing of the
  /// user data dir, the system install dir and `./resources`.
  pub fn resource_dir(&self) -> PathBuf {
    if let Some(dir) = &self.resource_dir {
      return dir.clone();
    }
    let mut candidates = Vec::new();
    if let Some(proj) = ProjectDirs::from("com", "mavensgroup", "molforge") {
      candidates.push(proj.data_dir().join("resources"));
    }
    candidates.push(PathBuf::from(SYSTEM_RESOURCE_DIR));
    let local = PathBuf::from("resources");
    candidates
      .into_iter()
      .find(|p| p.is_dir())
      .unwrap_or(local)
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("com", "mavensgroup", "molforge") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (cfg, msg) = Config::load_from(&dir.path().join("settings.json"));
    assert_eq!(cfg, Config::default());
    assert!(msg.contains("defaults"));
  }

  #[test]
  fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "cutoff": { "multiplier": 1.1, "skin": 0.2 }, "log_level": "debug" }"#).unwrap();
    let (cfg, msg) = Config::load_from(&path);
    assert!(msg.starts_with("Config loaded"));
    assert_eq!(cfg.cutoff.skin, 0.2);
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.radius_unit_divisor, 100.0);
    assert_eq!(cfg.defaults.radii_set, "Uniform");
  }

  #[test]
  fn test_out_of_range_cutoff_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "cutoff": { "multiplier": 1.0, "skin": 1e9 }, "log_level": "debug" }"#).unwrap();
    let (cfg, msg) = Config::load_from(&path);
    assert_eq!(cfg.cutoff, CutoffOptions::default());
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert!(msg.contains("using default cutoffs"));
  }

  #[test]
  fn test_bad_json_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();
    let (cfg, msg) = Config::load_from(&path);
    assert_eq!(cfg, Config::default());
    assert!(msg.starts_with("Error parsing config"));
  }

  #[test]
  fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let mut cfg = Config::default();
    cfg.defaults.bond_enabled = true;
    cfg.resource_dir = Some(PathBuf::from("/opt/presets"));
    assert!(cfg.save_to(&path).starts_with("Config saved"));
    let (loaded, _) = Config::load_from(&path);
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resource_dir(), PathBuf::from("/opt/presets"));
  }
}
