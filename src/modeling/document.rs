// src/modeling/document.rs
// In-memory modeling document. Records every component, body and appearance
// the build pipeline asks for, validates features the way a solid modeler
// would reject them, and serializes to JSON for export.

use super::engine::{AppearanceId, BodyId, ComponentId, MaterialId, ModelingEngine};
use super::primitives::{Feature, Revolve, Sweep, SweepOrientation, FULL_TURN, LENGTH_TOLERANCE};
use crate::error::EngineError;
use crate::presets::Rgb;
use crate::utils::geometry;
use serde::{Deserialize, Serialize};

/// Library appearance every element color is copied from.
pub const BASE_APPEARANCE: &str = "Prism-374";
/// Library material given to every generated body.
pub const BASE_MATERIAL: &str = "PrismMaterial-022";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub bodies: Vec<BodyId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub component: ComponentId,
    pub feature: Feature,
    pub material: Option<MaterialId>,
    pub appearance: Option<AppearanceId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appearance {
    pub name: String,
    pub base: String,
    pub albedo: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub components: Vec<Component>,
    pub bodies: Vec<Body>,
    pub appearances: Vec<Appearance>,
    pub materials: Vec<Material>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            materials: vec![Material {
                name: BASE_MATERIAL.to_string(),
            }],
            ..Self::default()
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn appearance(&self, id: AppearanceId) -> Option<&Appearance> {
        self.appearances.get(id.0)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    /// Body names of one component in creation order.
    pub fn body_names(&self, id: ComponentId) -> Vec<&str> {
        self.component(id)
            .map(|c| c.bodies.iter().filter_map(|b| self.body(*b)).map(|b| b.name.as_str()).collect())
            .unwrap_or_default()
    }

    fn push_body(&mut self, component: ComponentId, feature: Feature) -> Result<BodyId, EngineError> {
        let id = BodyId(self.bodies.len());
        let comp = self
            .components
            .get_mut(component.0)
            .ok_or(EngineError::UnknownComponent(component.0))?;
        comp.bodies.push(id);
        self.bodies.push(Body {
            // Hosts name fresh bodies generically until renamed.
            name: format!("Body{}", id.0 + 1),
            component,
            feature,
            material: None,
            appearance: None,
        });
        Ok(id)
    }
}

fn reject(feature: &'static str, reason: impl Into<String>) -> EngineError {
    EngineError::Rejected {
        feature,
        reason: reason.into(),
    }
}

fn check_finite(feature: &'static str, points: &[[f64; 3]]) -> Result<(), EngineError> {
    if points.iter().all(|p| geometry::is_finite(*p)) {
        Ok(())
    } else {
        Err(reject(feature, "non-finite coordinate"))
    }
}

impl ModelingEngine for Document {
    fn create_component(&mut self, name: &str) -> Result<ComponentId, EngineError> {
        let id = ComponentId(self.components.len());
        self.components.push(Component {
            name: name.to_string(),
            bodies: Vec::new(),
        });
        Ok(id)
    }

    fn revolve(&mut self, component: ComponentId, feature: &Revolve) -> Result<BodyId, EngineError> {
        check_finite("revolve", &[feature.profile.center(), feature.axis.start, feature.axis.end])?;
        if !(feature.profile.radius > LENGTH_TOLERANCE) {
            return Err(reject("revolve", format!("profile radius {}", feature.profile.radius)));
        }
        if feature.axis.length() <= LENGTH_TOLERANCE {
            return Err(reject("revolve", "axis has zero length"));
        }
        if !(feature.angle > 0.0 && feature.angle <= FULL_TURN + 1e-12) {
            return Err(reject("revolve", format!("angle {} outside (0, 2π]", feature.angle)));
        }
        self.push_body(component, Feature::Revolve(*feature))
    }

    fn sweep(&mut self, component: ComponentId, feature: &Sweep) -> Result<BodyId, EngineError> {
        check_finite("sweep", &[feature.profile.center(), feature.path.start, feature.path.end])?;
        if !(feature.profile.radius > LENGTH_TOLERANCE) {
            return Err(reject("sweep", format!("profile radius {}", feature.profile.radius)));
        }
        let tangent = match feature.path.direction() {
            Some(t) if feature.path.length() > LENGTH_TOLERANCE => t,
            _ => return Err(reject("sweep", "path has zero length")),
        };
        if feature.orientation == SweepOrientation::Perpendicular
            && geometry::dot(feature.profile.plane.normal(), tangent).abs() < 1.0 - 1e-6
        {
            return Err(reject("sweep", "profile plane is not perpendicular to the path"));
        }
        self.push_body(component, Feature::Sweep(*feature))
    }

    fn rename_body(&mut self, body: BodyId, name: &str) -> Result<(), EngineError> {
        let b = self.bodies.get_mut(body.0).ok_or(EngineError::UnknownBody(body.0))?;
        b.name = name.to_string();
        Ok(())
    }

    fn default_material(&self) -> MaterialId {
        MaterialId(0)
    }

    fn find_appearance(&self, name: &str) -> Option<AppearanceId> {
        self.appearances.iter().position(|a| a.name == name).map(AppearanceId)
    }

    fn copy_appearance(&mut self, name: &str, albedo: Rgb) -> Result<AppearanceId, EngineError> {
        if self.find_appearance(name).is_some() {
            return Err(EngineError::DuplicateAppearance(name.to_string()));
        }
        let id = AppearanceId(self.appearances.len());
        self.appearances.push(Appearance {
            name: name.to_string(),
            base: BASE_APPEARANCE.to_string(),
            albedo,
        });
        Ok(id)
    }

    fn assign(&mut self, body: BodyId, material: MaterialId, appearance: AppearanceId) -> Result<(), EngineError> {
        if appearance.0 >= self.appearances.len() {
            return Err(EngineError::UnknownAppearance(appearance.0));
        }
        let b = self.bodies.get_mut(body.0).ok_or(EngineError::UnknownBody(body.0))?;
        b.material = Some(material);
        b.appearance = Some(appearance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modeling::primitives::{Circle, Line, Plane};

    fn sphere(r: f64) -> Revolve {
        let c = [1.0, 2.0, 3.0];
        Revolve {
            profile: Circle {
                plane: Plane::xy().translated(c),
                radius: r,
            },
            axis: Line {
                start: [c[0] - r, c[1], c[2]],
                end: [c[0] + r, c[1], c[2]],
            },
            angle: FULL_TURN,
        }
    }

    #[test]
    fn test_revolve_creates_named_body() {
        let mut doc = Document::new();
        let comp = doc.create_component("Molecule").unwrap();
        let body = doc.revolve(comp, &sphere(0.5)).unwrap();
        doc.rename_body(body, "C1").unwrap();
        assert_eq!(doc.body_names(comp), vec!["C1"]);
        assert_eq!(doc.component(comp).unwrap().name, "Molecule");
    }

    #[test]
    fn test_zero_radius_revolve_is_rejected() {
        let mut doc = Document::new();
        let comp = doc.create_component("M").unwrap();
        let err = doc.revolve(comp, &sphere(0.0)).unwrap_err();
        assert!(matches!(err, EngineError::Rejected { feature: "revolve", .. }));
        assert!(doc.bodies.is_empty());
    }

    #[test]
    fn test_zero_length_sweep_is_rejected() {
        let mut doc = Document::new();
        let comp = doc.create_component("M").unwrap();
        let sweep = Sweep {
            profile: Circle {
                plane: Plane::xy(),
                radius: 0.1,
            },
            path: Line {
                start: [0.0; 3],
                end: [0.0; 3],
            },
            orientation: SweepOrientation::Perpendicular,
        };
        assert!(doc.sweep(comp, &sweep).is_err());
    }

    #[test]
    fn test_unknown_component() {
        let mut doc = Document::new();
        let err = doc.revolve(ComponentId(3), &sphere(1.0)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownComponent(3)));
    }

    #[test]
    fn test_copy_appearance_from_base() {
        let mut doc = Document::new();
        let id = doc.copy_appearance("O_color", Rgb(255, 13, 13)).unwrap();
        assert_eq!(doc.find_appearance("O_color"), Some(id));
        let a = doc.appearance(id).unwrap();
        assert_eq!(a.base, BASE_APPEARANCE);
        assert_eq!(a.albedo, Rgb(255, 13, 13));
        assert!(matches!(
            doc.copy_appearance("O_color", Rgb(0, 0, 0)),
            Err(EngineError::DuplicateAppearance(_))
        ));
    }

    #[test]
    fn test_assign_material_and_appearance() {
        let mut doc = Document::new();
        let comp = doc.create_component("M").unwrap();
        let body = doc.revolve(comp, &sphere(0.3)).unwrap();
        let app = doc.copy_appearance("H_color", Rgb(255, 255, 255)).unwrap();
        let mat = doc.default_material();
        doc.assign(body, mat, app).unwrap();
        let b = doc.body(body).unwrap();
        assert_eq!(b.material, Some(mat));
        assert_eq!(b.appearance, Some(app));
        assert_eq!(doc.materials[mat.0].name, BASE_MATERIAL);
        assert!(doc.assign(body, mat, AppearanceId(9)).is_err());
    }
}
