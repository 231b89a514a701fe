// src/modeling/engine.rs

use super::primitives::{Revolve, Sweep};
use crate::error::EngineError;
use crate::presets::Rgb;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppearanceId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub usize);

/// The host modeling document, seen from the build pipeline.
///
/// Every call mutates the document immediately; there is no transaction, so
/// bodies created before a failing call stay in place. Implementations are
/// driven from one thread only.
pub trait ModelingEngine {
    /// Adds a new top-level component to the document root.
    fn create_component(&mut self, name: &str) -> Result<ComponentId, EngineError>;

    /// Sketches the profile and axis, then revolves into a new body.
    fn revolve(&mut self, component: ComponentId, feature: &Revolve) -> Result<BodyId, EngineError>;

    /// Sketches the path, a construction plane at its start and the profile on
    /// that plane, then sweeps into a new body.
    fn sweep(&mut self, component: ComponentId, feature: &Sweep) -> Result<BodyId, EngineError>;

    fn rename_body(&mut self, body: BodyId, name: &str) -> Result<(), EngineError>;

    /// Physical material given to every generated body.
    fn default_material(&self) -> MaterialId;

    /// Looks up a document appearance by name.
    fn find_appearance(&self, name: &str) -> Option<AppearanceId>;

    /// Copies the baseline appearance template into the document under
    /// `name`, with its albedo color set to `albedo`.
    fn copy_appearance(&mut self, name: &str, albedo: Rgb) -> Result<AppearanceId, EngineError>;

    fn assign(&mut self, body: BodyId, material: MaterialId, appearance: AppearanceId) -> Result<(), EngineError>;
}
