// src/modeling/primitives.rs
// Geometric descriptions handed to the modeling engine. They carry no
// topology; the engine turns them into sketches, features and bodies.

use crate::utils::geometry::{self, Point3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Full turn, the extent of every atom revolve.
pub const FULL_TURN: f64 = 2.0 * PI;

/// Lengths below this are degenerate (model units).
pub const LENGTH_TOLERANCE: f64 = 1e-9;

/// A construction plane: origin plus two orthonormal in-plane axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub x_axis: Point3,
    pub y_axis: Point3,
}

impl Plane {
    /// The component's XY construction plane.
    pub fn xy() -> Self {
        Self {
            origin: [0.0; 3],
            x_axis: [1.0, 0.0, 0.0],
            y_axis: [0.0, 1.0, 0.0],
        }
    }

    pub fn translated(&self, origin: Point3) -> Self {
        Self { origin, ..*self }
    }

    /// Plane through `origin` whose normal is `normal` (unit length).
    pub fn perpendicular_to(origin: Point3, normal: Point3) -> Self {
        let (x_axis, y_axis) = geometry::perpendicular_basis(normal);
        Self { origin, x_axis, y_axis }
    }

    pub fn normal(&self) -> Point3 {
        geometry::cross(self.x_axis, self.y_axis)
    }
}

/// Circle sketched on `plane`, centered at the plane origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub plane: Plane,
    pub radius: f64,
}

impl Circle {
    pub fn center(&self) -> Point3 {
        self.plane.origin
    }
}

/// Straight segment; used both as a revolve axis and as a sweep path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3,
    pub end: Point3,
}

impl Line {
    pub fn length(&self) -> f64 {
        geometry::calculate_distance(self.start, self.end)
    }

    pub fn direction(&self) -> Option<Point3> {
        geometry::direction(self.start, self.end)
    }
}

/// Circle region revolved about an axis. With the axis through the circle
/// center this yields a sphere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Revolve {
    pub profile: Circle,
    pub axis: Line,
    pub angle: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepOrientation {
    /// Profile stays perpendicular to the path tangent.
    Perpendicular,
    /// Profile keeps its initial orientation.
    Parallel,
}

/// Circular profile swept along a path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub profile: Circle,
    pub path: Line,
    pub orientation: SweepOrientation,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Feature {
    Revolve(Revolve),
    Sweep(Sweep),
}

impl Feature {
    pub fn is_sweep(&self) -> bool {
        matches!(self, Feature::Sweep(_))
    }
}
