// src/model/params.rs

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Molecule";
pub const DEFAULT_RADII: &str = "Uniform";
pub const DEFAULT_COLORS: &str = "Default";
pub const DEFAULT_BOND_RADIUS: f64 = 0.1;

/// Range accepted by the parameter surface for the bond radius.
pub const BOND_RADIUS_MIN: f64 = 0.01;
pub const BOND_RADIUS_MAX: f64 = 100.0;

/// Everything the user chooses for one build. Populated once by the boundary
/// layer, read-only while the build runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildParams {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_radii")]
    pub radii_set: String,
    #[serde(default = "default_colors")]
    pub colors_set: String,
    #[serde(default)]
    pub bond_enabled: bool,
    #[serde(default = "default_bond_radius")]
    pub bond_radius: f64,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_radii() -> String {
    DEFAULT_RADII.to_string()
}

fn default_colors() -> String {
    DEFAULT_COLORS.to_string()
}

fn default_bond_radius() -> f64 {
    DEFAULT_BOND_RADIUS
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            name: default_name(),
            radii_set: default_radii(),
            colors_set: default_colors(),
            bond_enabled: false,
            bond_radius: DEFAULT_BOND_RADIUS,
        }
    }
}

impl BuildParams {
    /// Bonds are drawn only when enabled and the radius is strictly positive.
    pub fn draws_bonds(&self) -> bool {
        self.bond_enabled && self.bond_radius > 0.0
    }

    /// Checks done by the parameter surface before a build is started.
    ///
    /// A bond radius of exactly zero is let through: the core treats it as
    /// "bonds disabled".
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidParameter(
                "molecule name must not be empty".to_string(),
            ));
        }
        if !self.bond_radius.is_finite() || self.bond_radius < 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "bond radius {} is not a non-negative number",
                self.bond_radius
            )));
        }
        if self.bond_enabled
            && self.bond_radius > 0.0
            && !(BOND_RADIUS_MIN..=BOND_RADIUS_MAX).contains(&self.bond_radius)
        {
            return Err(ConfigError::InvalidParameter(format!(
                "bond radius {} outside {}..{}",
                self.bond_radius, BOND_RADIUS_MIN, BOND_RADIUS_MAX
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parameter_surface() {
        let p = BuildParams::default();
        assert_eq!(p.name, "Molecule");
        assert_eq!(p.radii_set, "Uniform");
        assert_eq!(p.colors_set, "Default");
        assert!(!p.bond_enabled);
        assert_eq!(p.bond_radius, 0.1);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_zero_radius_disables_bonds() {
        let p = BuildParams {
            bond_enabled: true,
            bond_radius: 0.0,
            ..Default::default()
        };
        assert!(!p.draws_bonds());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_radius_rejected() {
        let p = BuildParams {
            bond_enabled: true,
            bond_radius: 250.0,
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(ConfigError::InvalidParameter(_))));

        let p = BuildParams {
            bond_radius: -1.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let p: BuildParams = serde_json::from_str(r#"{"name":"Water","bond_enabled":true}"#).unwrap();
        assert_eq!(p.name, "Water");
        assert_eq!(p.radii_set, "Uniform");
        assert!(p.draws_bonds());
    }
}
