// src/session.rs
// Resources that live for one run of the tool: configuration, the preset
// library and the modeling document every build writes into.

use crate::config::Config;
use crate::error::{BuildError, ConfigError};
use crate::model::params::BuildParams;
use crate::model::structure::Structure;
use crate::modeling::document::Document;
use crate::molecule::{BuildReport, MoleculeBuild};
use crate::presets::PresetLibrary;
use log::info;
use std::path::Path;

pub struct Session {
    pub config: Config,
    pub presets: PresetLibrary,
    pub document: Document,
}

impl Session {
    /// Loads presets from `resources`, or from the configured directory.
    pub fn open(config: Config, resources: Option<&Path>) -> Result<Self, ConfigError> {
        let dir = resources.map(Path::to_path_buf).unwrap_or_else(|| config.resource_dir());
        info!("Resource directory: {:?}", dir);
        let presets = PresetLibrary::load(&dir)?;
        Ok(Self {
            config,
            presets,
            document: Document::new(),
        })
    }

    /// One build command: configure, build, tear down.
    ///
    /// On failure the returned report holds whatever was committed.
    pub fn build(&mut self, structure: &Structure, params: BuildParams) -> (BuildReport, Result<(), BuildError>) {
        let mut build = MoleculeBuild::new(structure, &self.presets, self.config.build_settings(), params);
        let result = build.build(&mut self.document).map(|_| ());
        let report = build.report().clone();
        build.teardown();
        (report, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structure::Cell;
    use std::path::PathBuf;

    fn bundled() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
    }

    #[test]
    fn test_build_water_with_bundled_presets() {
        let mut session = Session::open(Config::default(), Some(&bundled())).unwrap();
        let water = Structure::from_atoms(
            Cell::isolated(),
            vec![("O", [0.0, 0.0, 0.1173]), ("H", [0.0, 0.7572, -0.4692]), ("H", [0.0, -0.7572, -0.4692])],
        );
        let params = BuildParams {
            name: "Water".into(),
            radii_set: "VDW".into(),
            bond_enabled: true,
            ..BuildParams::default()
        };
        let (report, result) = session.build(&water, params);
        result.unwrap();
        assert_eq!(report.atom_bodies.len(), 3);
        // O-H twice in each direction.
        assert_eq!(report.bond_bodies.len(), 4);
        let names = session.document.body_names(report.component.unwrap());
        assert_eq!(names, vec!["O1", "Bond_O1-2", "Bond_O1-3", "H1", "Bond_H1-1", "H2", "Bond_H2-1"]);
        assert_eq!(session.document.appearances.len(), 2);
    }

    #[test]
    fn test_missing_resource_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            Session::open(Config::default(), Some(&missing)),
            Err(ConfigError::MissingResourceDir(_))
        ));
    }

    #[test]
    fn test_failed_build_reports_partial_state() {
        let mut session = Session::open(Config::default(), Some(&bundled())).unwrap();
        let st = Structure::from_atoms(Cell::isolated(), vec![("C", [0.0; 3]), ("C", [0.0; 3])]);
        let params = BuildParams {
            bond_enabled: true,
            ..BuildParams::default()
        };
        let (report, result) = session.build(&st, params);
        assert!(result.is_err());
        assert_eq!(report.atom_bodies.len(), 1);
        assert_eq!(session.document.bodies.len(), 1);
    }
}
