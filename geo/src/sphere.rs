use crate::ray::Ray;
use crate::vec3::Vec3;

/// The result of a successful ray/sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereHit {
    /// Ray parameter of the intersection point.
    pub t: f64,

    /// Whether the ray hit the sphere from the outside. A `false` value means
    /// the ray originated inside the sphere.
    pub front_face: bool,
}

/// Intersect a sphere defined by `center` and `radius` with a `Ray` whose
/// direction is assumed to be unit length.
///
/// Follows the closest-hit convention: a hit with `t <= 0` never counts, the
/// front-facing root `t1` is preferred over the back-facing root `t2`, and
/// `None` is returned when both roots are non-positive.
pub fn ray_intersection(center: Vec3, radius: f64, ray: &Ray) -> Option<SphereHit> {
    let oc = ray.origin - center;

    let b = ray.dir.dot(&oc);
    let c = oc.dot(&oc) - radius * radius;
    let discr = b * b - c;

    if discr < 0.0 {
        return None;
    }

    let sqrt_discr = discr.sqrt();
    let t1 = -b - sqrt_discr;
    let t2 = -b + sqrt_discr;

    if t2 <= 0.0 {
        return None;
    }

    if t1 > 0.0 {
        Some(SphereHit {
            t: t1,
            front_face: true,
        })
    } else {
        Some(SphereHit {
            t: t2,
            front_face: false,
        })
    }
}

/// Calculate the outward-facing normal at point `p` on a sphere centered at
/// `center`. The radius is not needed since the normal only depends on
/// direction.
pub fn normal(center: Vec3, p: Vec3) -> Vec3 {
    (p - center).normalized()
}
