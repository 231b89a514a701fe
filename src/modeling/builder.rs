// src/modeling/builder.rs
// Atom spheres and half-bond tubes: pure geometric descriptions plus the
// emitter that commits them to a modeling engine under their display names.

use super::engine::{BodyId, ComponentId, ModelingEngine};
use super::primitives::{Circle, Line, Plane, Revolve, Sweep, SweepOrientation, FULL_TURN, LENGTH_TOLERANCE};
use crate::error::{BuildError, GeometryError};
use crate::model::structure::{Atom, Structure};
use crate::physics::neighbors::Neighbor;
use crate::utils::geometry::{self, Point3};
use log::debug;
use std::collections::HashMap;

// --- Naming ---

/// Per-symbol running count; yields C1, C2, ... regardless of interleaving.
#[derive(Debug, Default, Clone)]
pub struct OccurrenceCounter {
    counts: HashMap<String, usize>,
}

impl OccurrenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more atom of `symbol` and returns its 1-based occurrence.
    pub fn next(&mut self, symbol: &str) -> usize {
        let n = self.counts.entry(symbol.to_string()).or_insert(0);
        *n += 1;
        *n
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }
}

pub fn atom_body_name(symbol: &str, occurrence: usize) -> String {
    format!("{}{}", symbol, occurrence)
}

/// `neighbor_index` is zero-based; the name carries it one-based.
pub fn bond_body_name(symbol: &str, occurrence: usize, neighbor_index: usize) -> String {
    format!("Bond_{}{}-{}", symbol, occurrence, neighbor_index + 1)
}

// --- Descriptions ---

/// Sphere of radius `radius` at `center`: a circle on the XY plane through
/// the center, revolved a full turn about the in-plane x axis spanning
/// `[center - r x, center + r x]`.
pub fn atom_revolve(body: &str, center: Point3, radius: f64) -> Result<Revolve, GeometryError> {
    if !geometry::is_finite(center) || !radius.is_finite() {
        return Err(GeometryError::NonFinite { body: body.to_string() });
    }
    if radius <= LENGTH_TOLERANCE {
        return Err(GeometryError::ZeroRadius {
            body: body.to_string(),
            radius,
        });
    }

    let plane = Plane::xy().translated(center);
    let x = plane.x_axis;
    Ok(Revolve {
        profile: Circle { plane, radius },
        axis: Line {
            start: geometry::sub(center, geometry::scale(x, radius)),
            end: geometry::add(center, geometry::scale(x, radius)),
        },
        angle: FULL_TURN,
    })
}

/// Tube of radius `bond_radius` from `start` to the midpoint between `start`
/// and `neighbor`, with the profile plane perpendicular to the path.
pub fn half_bond_sweep(body: &str, start: Point3, neighbor: Point3, bond_radius: f64) -> Result<Sweep, GeometryError> {
    if !geometry::is_finite(start) || !geometry::is_finite(neighbor) || !bond_radius.is_finite() {
        return Err(GeometryError::NonFinite { body: body.to_string() });
    }

    let end = geometry::midpoint(start, neighbor);
    let path = Line { start, end };
    let tangent = path.direction().ok_or_else(|| GeometryError::CoincidentEndpoints {
        body: body.to_string(),
        length: path.length(),
    })?;
    if path.length() <= LENGTH_TOLERANCE {
        return Err(GeometryError::CoincidentEndpoints {
            body: body.to_string(),
            length: path.length(),
        });
    }

    Ok(Sweep {
        profile: Circle {
            plane: Plane::perpendicular_to(start, tangent),
            radius: bond_radius,
        },
        path,
        orientation: SweepOrientation::Perpendicular,
    })
}

// --- Emission ---

/// Commits atom and half-bond bodies into one component.
pub struct GeometryBuilder<'a, E: ModelingEngine + ?Sized> {
    engine: &'a mut E,
    component: ComponentId,
}

impl<'a, E: ModelingEngine + ?Sized> GeometryBuilder<'a, E> {
    pub fn new(engine: &'a mut E, component: ComponentId) -> Self {
        Self { engine, component }
    }

    pub fn engine(&mut self) -> &mut E {
        self.engine
    }

    /// Revolves the atom sphere and names the body `<symbol><occurrence>`.
    pub fn emit_atom(&mut self, atom: &Atom, occurrence: usize, radius: f64) -> Result<BodyId, BuildError> {
        let name = atom_body_name(&atom.element, occurrence);
        let revolve = atom_revolve(&name, atom.position, radius)?;
        let body = self.engine.revolve(self.component, &revolve)?;
        self.engine.rename_body(body, &name)?;
        debug!("Atom body {} (r = {:.4})", name, radius);
        Ok(body)
    }

    /// One half-bond per directed neighbor record of `atom`. Stops at the
    /// first failure; bodies already swept stay in the document.
    pub fn emit_half_bonds(
        &mut self,
        structure: &Structure,
        atom: &Atom,
        occurrence: usize,
        neighbors: &[Neighbor],
        bond_radius: f64,
    ) -> Result<Vec<BodyId>, BuildError> {
        let mut bodies = Vec::with_capacity(neighbors.len());
        for nb in neighbors {
            let name = bond_body_name(&atom.element, occurrence, nb.index);
            let other = structure.atoms.get(nb.index).ok_or_else(|| GeometryError::BadNeighbor {
                body: name.clone(),
                index: nb.index,
            })?;
            let q = structure.cell.image_of(other.position, nb.offset);
            let sweep = half_bond_sweep(&name, atom.position, q, bond_radius)?;
            let body = self.engine.sweep(self.component, &sweep)?;
            self.engine.rename_body(body, &name)?;
            bodies.push(body);
        }
        Ok(bodies)
    }
}
