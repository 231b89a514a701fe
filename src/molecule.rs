// src/molecule.rs
// Molecule build orchestrator: owns the parameters of one build and drives
// neighbor resolution, geometry emission and appearance assignment.

use crate::error::BuildError;
use crate::model::params::BuildParams;
use crate::model::structure::Structure;
use crate::modeling::appearance::{AppearanceCache, CacheStats};
use crate::modeling::builder::{GeometryBuilder, OccurrenceCounter};
use crate::modeling::engine::{BodyId, ComponentId, ModelingEngine};
use crate::physics::neighbors::{CutoffOptions, NeighborList};
use crate::presets::PresetLibrary;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Preset radii are in picometres; model units are 100 pm.
pub const DEFAULT_RADIUS_UNIT_DIVISOR: f64 = 100.0;

/// Settings fixed for the session, handed to every build.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    pub cutoff: CutoffOptions,
    /// Preset radius values are divided by this before modeling.
    pub radius_unit_divisor: f64,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            cutoff: CutoffOptions::default(),
            radius_unit_divisor: DEFAULT_RADIUS_UNIT_DIVISOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BuildState {
    Configured,
    Building,
    Done,
    Failed(String),
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildState::Configured => write!(f, "configured"),
            BuildState::Building => write!(f, "building"),
            BuildState::Done => write!(f, "done"),
            BuildState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// What a finished build put into the document.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    pub name: String,
    pub component: Option<ComponentId>,
    pub atom_bodies: Vec<BodyId>,
    pub bond_bodies: Vec<BodyId>,
    /// Directed neighbor records found, whether or not bonds were drawn.
    pub neighbor_records: usize,
    pub periodic: bool,
    pub appearances: CacheStats,
}

pub struct MoleculeBuild<'a> {
    structure: &'a Structure,
    presets: &'a PresetLibrary,
    settings: BuildSettings,
    params: BuildParams,
    state: BuildState,
    counter: OccurrenceCounter,
    cache: AppearanceCache,
    report: BuildReport,
}

impl<'a> MoleculeBuild<'a> {
    pub fn new(structure: &'a Structure, presets: &'a PresetLibrary, settings: BuildSettings, params: BuildParams) -> Self {
        Self {
            structure,
            presets,
            settings,
            params,
            state: BuildState::Configured,
            counter: OccurrenceCounter::new(),
            cache: AppearanceCache::new(),
            report: BuildReport::default(),
        }
    }

    pub fn state(&self) -> &BuildState {
        &self.state
    }

    pub fn params(&self) -> &BuildParams {
        &self.params
    }

    /// Partial for a failed build: the bodies committed before the failure.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Runs the whole pipeline once. Only valid in the `Configured` state.
    ///
    /// Parameter and preset-name problems are caught before the document is
    /// touched. Anything failing later leaves the bodies already created in
    /// place.
    pub fn build<E: ModelingEngine + ?Sized>(&mut self, engine: &mut E) -> Result<&BuildReport, BuildError> {
        if self.state != BuildState::Configured {
            return Err(BuildError::AlreadyBuilt(self.params.name.clone()));
        }
        self.state = BuildState::Building;
        self.report = BuildReport {
            name: self.params.name.clone(),
            ..BuildReport::default()
        };

        match self.run(engine) {
            Ok(()) => {
                self.state = BuildState::Done;
                self.report.appearances = self.cache.stats();
                info!(
                    "Built '{}': {} atoms, {} half-bonds",
                    self.report.name,
                    self.report.atom_bodies.len(),
                    self.report.bond_bodies.len()
                );
                Ok(&self.report)
            }
            Err(e) => {
                error!("Build of '{}' failed: {}", self.params.name, e);
                self.state = BuildState::Failed(e.to_string());
                self.report.appearances = self.cache.stats();
                Err(e)
            }
        }
    }

    /// Drops per-build state and returns to `Configured`. Bodies already in
    /// the document are not touched.
    pub fn teardown(&mut self) {
        debug!("Tearing down build '{}' ({})", self.params.name, self.state);
        self.counter.reset();
        self.cache.reset_stats();
        self.report = BuildReport::default();
        self.state = BuildState::Configured;
    }

    fn run<E: ModelingEngine + ?Sized>(&mut self, engine: &mut E) -> Result<(), BuildError> {
        let params = &self.params;
        params.validate()?;
        self.settings.cutoff.validate()?;
        self.presets.check(&params.radii_set, &params.colors_set)?;

        let neighbors = NeighborList::compute(self.structure, &self.settings.cutoff);
        self.report.neighbor_records = neighbors.directed_count();
        self.report.periodic = neighbors.is_periodic();
        let draw_bonds = params.draws_bonds();
        if params.bond_enabled && !draw_bonds {
            info!("Bond radius is 0; bonds skipped");
        }

        let component = engine.create_component(&params.name)?;
        self.report.component = Some(component);
        let material = engine.default_material();
        let mut builder = GeometryBuilder::new(engine, component);

        for atom in &self.structure.atoms {
            let occurrence = self.counter.next(&atom.element);
            let radius = self.presets.radius(&params.radii_set, &atom.element)? / self.settings.radius_unit_divisor;
            let color = self.presets.color(&params.colors_set, &atom.element)?;

            let atom_body = builder.emit_atom(atom, occurrence, radius)?;
            self.report.atom_bodies.push(atom_body);

            let mut bodies = vec![atom_body];
            if draw_bonds {
                let bonds = builder.emit_half_bonds(
                    self.structure,
                    atom,
                    occurrence,
                    neighbors.get_neighbors(atom.index),
                    params.bond_radius,
                )?;
                self.report.bond_bodies.extend_from_slice(&bonds);
                bodies.extend(bonds);
            }

            let appearance = self.cache.get_or_create(builder.engine(), &atom.element, color)?;
            for body in bodies {
                builder.engine().assign(body, material, appearance)?;
            }
        }
        Ok(())
    }
}
