use crate::ray::Ray;
use crate::vec3::Vec3;

/// Below this angle between ray direction and plane normal the ray is
/// considered parallel to the plane and reported as a miss.
const PARALLEL_EPS: f64 = 1e-9;

/// Intersect a plane through `point` with the given unit `normal` and a
/// `Ray`. Returns the ray parameter of the intersection, or `None` if the
/// ray is (near-)parallel to the plane or the intersection is behind the
/// ray's origin.
pub fn ray_intersection(point: Vec3, normal: Vec3, ray: &Ray) -> Option<f64> {
    let denom = normal.dot(&ray.dir);
    if denom.abs() < PARALLEL_EPS {
        return None;
    }

    let t = normal.dot(&(point - ray.origin)) / denom;
    if t <= 0.0 {
        return None;
    }

    Some(t)
}

#[cfg(test)]
mod tests {
    use super::{ray_intersection, Ray, Vec3};

    #[test]
    fn test_ray_intersection() {
        let point = Vec3::new(0.0, 0.0, 0.0);
        let normal = Vec3::new(0.0, 1.0, 0.0);

        let t = ray_intersection(
            point,
            normal,
            &Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
        )
        .unwrap();

        assert_eq!(t, 5.0);
    }

    #[test]
    fn test_ray_intersection_parallel() {
        let point = Vec3::new(0.0, 0.0, 0.0);
        let normal = Vec3::new(0.0, 1.0, 0.0);

        assert_eq!(
            ray_intersection(
                point,
                normal,
                &Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            ),
            None
        );
    }

    #[test]
    fn test_ray_intersection_behind_ray() {
        // Plane at y=0, ray starting at y=1 going up: the plane is behind it.
        assert_eq!(
            ray_intersection(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                &Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            ),
            None
        );
    }
}
