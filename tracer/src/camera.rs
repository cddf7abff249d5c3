use rand::Rng;

use geo::{ray::Ray, Transform, Vec3};

use crate::error::{Error, Result};

/// Field of view, specified either as the vertical or the horizontal half
/// angle's full extent, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fov {
    Vertical(f64),
    Horizontal(f64),
}

/// Generates primary rays for a raster grid. Holds no render state beyond
/// its own geometry, so it's trivially `Copy`-cheap to share across worker
/// threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    pub transform: Transform,
    pub focal_length: f64,
    pub fov: Fov,
}

impl Camera {
    pub fn new(width: u32, height: u32, transform: Transform, fov: Fov) -> Self {
        Camera {
            width,
            height,
            transform,
            focal_length: 1.0,
            fov,
        }
    }

    fn half_extents(&self) -> (f64, f64) {
        let aspect = f64::from(self.width) / f64::from(self.height);

        match self.fov {
            Fov::Vertical(deg) => {
                let half_h = self.focal_length * (deg.to_radians() / 2.0).tan();
                (aspect * half_h, half_h)
            }
            Fov::Horizontal(deg) => {
                let half_w = self.focal_length * (deg.to_radians() / 2.0).tan();
                (half_w, half_w / aspect)
            }
        }
    }

    /// The primary ray through the center of pixel `(x, y)`, no jitter.
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        self.ray_through(f64::from(x) + 0.5, f64::from(y) + 0.5)
    }

    /// A primary ray through pixel `(x, y)`, jittered by a uniform offset in
    /// `[-0.5, 0.5]^2` for supersampling.
    pub fn jittered_ray(&self, x: u32, y: u32, rng: &mut impl Rng) -> Ray {
        let jx: f64 = rng.gen::<f64>() - 0.5;
        let jy: f64 = rng.gen::<f64>() - 0.5;

        self.ray_through(f64::from(x) + 0.5 + jx, f64::from(y) + 0.5 + jy)
    }

    /// Reject a non-positive or degenerate (>= 180 degree) field of view and
    /// a zero-sized raster, before a render ever spends a sample on them.
    pub fn validate(&self) -> Result<()> {
        let deg = match self.fov {
            Fov::Vertical(d) | Fov::Horizontal(d) => d,
        };

        if !(deg > 0.0 && deg < 180.0) {
            return Err(Error::Config(format!(
                "field of view must be in (0, 180) degrees, got {deg}"
            )));
        }

        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "camera resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }

    fn ray_through(&self, px: f64, py: f64) -> Ray {
        let (half_w, half_h) = self.half_extents();

        let ndc_x = px / f64::from(self.width) * 2.0 - 1.0;
        let ndc_y = 1.0 - py / f64::from(self.height) * 2.0;

        let local_dir = Vec3::new(ndc_x * half_w, ndc_y * half_h, -self.focal_length).normalized();
        let world_dir = self.transform.vector_to_world(local_dir).normalized();

        Ray::new(self.transform.position, world_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_primary_ray_center_points_forward() {
        // Odd resolution so the center pixel's center coincides exactly
        // with the image's geometric center.
        let camera = Camera::new(5, 5, Transform::identity(), Fov::Vertical(90.0));
        let ray = camera.primary_ray(2, 2);

        assert!((ray.dir.x).abs() < 1e-9);
        assert!((ray.dir.y).abs() < 1e-9);
        assert!((ray.dir.z - (-1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_jittered_ray_stays_within_fov_cone() {
        let camera = Camera::new(10, 10, Transform::identity(), Fov::Vertical(60.0));
        let mut rng = XorShiftRng::seed_from_u64(7);

        for _ in 0..50 {
            let ray = camera.jittered_ray(5, 5, &mut rng);
            assert!((ray.dir.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_translated_camera_offsets_origin() {
        let transform = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        let camera = Camera::new(4, 4, transform, Fov::Vertical(90.0));

        assert_eq!(camera.primary_ray(0, 0).origin, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_validate_rejects_zero_and_straight_fov() {
        let zero_fov = Camera::new(4, 4, Transform::identity(), Fov::Vertical(0.0));
        let flat_fov = Camera::new(4, 4, Transform::identity(), Fov::Vertical(180.0));

        assert!(zero_fov.validate().is_err());
        assert!(flat_fov.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_resolution() {
        let camera = Camera::new(0, 4, Transform::identity(), Fov::Vertical(90.0));
        assert!(camera.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_sane_camera() {
        let camera = Camera::new(4, 4, Transform::identity(), Fov::Vertical(90.0));
        assert!(camera.validate().is_ok());
    }
}
