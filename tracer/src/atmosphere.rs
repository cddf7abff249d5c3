use std::f64::consts::PI;

use geo::{ray::Ray, Vec3};

/// Bias used both to reject a grazing shell intersection and to decide
/// whether a light-path segment is short enough to march as a single step.
const BIAS: f64 = 1e-3;
const SHORT_SEGMENT: f64 = 1.0;
const VIEW_SEGMENTS: u32 = 32;
const LIGHT_SEGMENTS: u32 = 32;

/// A planetary atmosphere: two concentric spheres with exponentially
/// falling-off Rayleigh and Mie scattering coefficients between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub center: Vec3,
    pub ground_radius: f64,
    pub atmosphere_radius: f64,
    pub beta_r0: Vec3,
    pub h_r: f64,
    pub beta_m0: f64,
    pub h_m: f64,
    pub g_mie: f64,
}

impl Atmosphere {
    /// In-scattered sky radiance along `ray`, lit by a sun shining from
    /// `sun_dir` (pointing toward the sun) with radiance `sun_li`.
    pub fn sky_color(&self, ray: &Ray, sun_dir: Vec3, sun_li: Vec3) -> Vec3 {
        let atmo_roots = match sphere_roots(self.center, self.atmosphere_radius, ray) {
            Some(r) if r.1 > BIAS => r,
            _ => return Vec3::zero(),
        };

        let mut t_end = atmo_roots.1;
        if let Some((t0, _)) = sphere_roots(self.center, self.ground_radius, ray) {
            if t0 > BIAS {
                t_end = t_end.min(t0);
            }
        }

        if t_end <= BIAS {
            return Vec3::zero();
        }

        let dt = t_end / f64::from(VIEW_SEGMENTS);
        let cos_theta = (-ray.dir).dot(&sun_dir);
        let phase_r = phase_rayleigh(cos_theta);
        let phase_m = phase_mie(cos_theta, self.g_mie);

        let mut tr = Vec3::one();
        let mut lo_r = Vec3::zero();
        let mut lo_m = Vec3::zero();

        for i in 0..VIEW_SEGMENTS {
            let t_mid = dt * (f64::from(i) + 0.5);
            let p = ray.point_at(t_mid);

            let (beta_r, beta_m) = self.coefficients_at(p);
            tr *= segment_extinction(beta_r, beta_m, dt);

            let light_ray = Ray::new(p, sun_dir);
            let t_light = match sphere_roots(self.center, self.atmosphere_radius, &light_ray) {
                Some((_, t1)) if t1 > 0.0 => t1,
                _ => 0.0,
            };
            let tr_light = self.transmittance_along(&light_ray, t_light);

            lo_r += tr * beta_r * (phase_r * dt) * sun_li * tr_light;
            lo_m += tr * beta_m * (phase_m * dt) * sun_li * tr_light;
        }

        lo_r + lo_m
    }

    fn coefficients_at(&self, p: Vec3) -> (Vec3, Vec3) {
        let h = (p - self.center).norm() - self.ground_radius;
        let beta_r = self.beta_r0 * (-h / self.h_r).exp();
        let beta_m = self.beta_m0 * (-h / self.h_m).exp();
        (beta_r, Vec3::new(beta_m, beta_m, beta_m))
    }

    /// Transmittance along `ray` for a distance of `length`, marched in a
    /// single segment when `length` is short and in `LIGHT_SEGMENTS`
    /// sub-intervals otherwise.
    fn transmittance_along(&self, ray: &Ray, length: f64) -> Vec3 {
        if length <= 0.0 {
            return Vec3::one();
        }

        let n_seg = if length < SHORT_SEGMENT {
            1
        } else {
            LIGHT_SEGMENTS
        };
        let dt = length / f64::from(n_seg);

        let mut tr = Vec3::one();
        for i in 0..n_seg {
            let t_mid = dt * (f64::from(i) + 0.5);
            let p = ray.point_at(t_mid);
            let (beta_r, beta_m) = self.coefficients_at(p);
            tr *= segment_extinction(beta_r, beta_m, dt);
        }

        tr
    }
}

fn segment_extinction(beta_r: Vec3, beta_m: Vec3, dt: f64) -> Vec3 {
    (-(beta_r + beta_m) * dt).exp()
}

/// Rayleigh phase function.
pub fn phase_rayleigh(cos_theta: f64) -> f64 {
    3.0 / (16.0 * PI) * (1.0 + cos_theta * cos_theta)
}

/// Henyey-Greenstein-flavoured Mie phase function. Uses the same sign
/// convention for the `2g*cos_theta` term as the participating medium's
/// phase function in `pathtracer`, so the two stay consistent within this
/// build (see DESIGN.md).
pub fn phase_mie(cos_theta: f64, g: f64) -> f64 {
    let g2 = g * g;
    let denom = (2.0 + g2) * (1.0 + g2 + 2.0 * g * cos_theta).powf(1.5);
    3.0 / (8.0 * PI) * (1.0 - g2) * (1.0 + cos_theta * cos_theta) / denom
}

/// Both roots of the ray/sphere quadratic, unfiltered by sign — the
/// atmosphere needs to know about intersections behind the ray origin too,
/// unlike the closest-hit convention used for actors.
fn sphere_roots(center: Vec3, radius: f64, ray: &Ray) -> Option<(f64, f64)> {
    let oc = ray.origin - center;
    let b = ray.dir.dot(&oc);
    let c = oc.dot(&oc) - radius * radius;
    let discr = b * b - c;

    if discr < 0.0 {
        return None;
    }

    let sq = discr.sqrt();
    Some((-b - sq, -b + sq))
}
