use std::f64::consts::PI;

use geo::{ray::Ray, plane, sphere, Transform, Vec3};

/// A tagged variant over the analytic primitives this tracer supports. Both
/// variants are defined in the actor's local frame; the actor's `Transform`
/// places them in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Sphere { radius: f64 },
    Plane,
}

/// The result of a successful closest-hit test against a `Geometry`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub uv: (f64, f64),
    pub distance: f64,
    pub front_face: bool,
}

impl Geometry {
    /// Closest-hit against a ray already expressed in world space, given the
    /// actor's world `Transform`. A hit with `t <= 0` is treated as no hit.
    pub fn intersect(&self, ray: &Ray, transform: &Transform) -> Option<GeometryHit> {
        match *self {
            Geometry::Sphere { radius } => {
                let center = transform.position;
                let hit = sphere::ray_intersection(center, radius, ray)?;

                let point = ray.point_at(hit.t);
                let outward_normal = sphere::normal(center, point);
                let normal = if hit.front_face {
                    outward_normal
                } else {
                    -outward_normal
                };

                Some(GeometryHit {
                    point,
                    normal,
                    uv: sphere_uv(outward_normal),
                    distance: hit.t,
                    front_face: hit.front_face,
                })
            }
            Geometry::Plane => {
                let normal = transform.up();
                let t = plane::ray_intersection(transform.position, normal, ray)?;

                let point = ray.point_at(t);
                let front_face = normal.dot(&ray.dir) < 0.0;
                let facing_normal = if front_face { normal } else { -normal };

                Some(GeometryHit {
                    point,
                    normal: facing_normal,
                    uv: (0.0, 0.0),
                    distance: t,
                    front_face,
                })
            }
        }
    }
}

/// Map a unit outward sphere normal to spherical (u, v) in `[0, 1]^2`. Not
/// consumed by any shading model in this crate, kept for completeness.
fn sphere_uv(outward_normal: Vec3) -> (f64, f64) {
    let theta = (-outward_normal.y).acos();
    let phi = (-outward_normal.z).atan2(outward_normal.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}
