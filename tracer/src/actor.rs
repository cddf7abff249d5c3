use geo::{ray::Ray, Transform};

use crate::geometry::{Geometry, GeometryHit};
use crate::material::Material;

/// A renderable scene entity combining geometry, material, and transform.
/// An actor without `geometry` can't be intersected; an actor without
/// `material` is intersectable but renders with the sky/atmosphere color,
/// matching the data model's "unlit" case.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub name: String,
    pub geometry: Option<Geometry>,
    pub material: Option<Material>,
    pub transform: Transform,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Actor {
            name: name.into(),
            geometry: None,
            material: None,
            transform: Transform::identity(),
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Delegate to the actor's geometry, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<GeometryHit> {
        self.geometry.as_ref()?.intersect(ray, &self.transform)
    }
}

/// A closest-hit against the whole scene: a `GeometryHit` stamped with the
/// index of the actor it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub geom: GeometryHit,
    pub actor_index: usize,
}
