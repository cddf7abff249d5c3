use rand::Rng;

use geo::{Transform, Vec3};

/// Radiance falloff epsilon for point/area lights, avoiding a division by
/// zero when the shade point coincides with the light position.
const FALLOFF_EPS: f64 = 1e-4;

/// A tagged variant over the light sources this tracer can sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel rays arriving from infinity along the transform's forward
    /// axis; `strength` is treated as a dimensionless multiplier (the source
    /// spec leaves its exact units undefined, see DESIGN.md).
    Directional {
        transform: Transform,
        color: Vec3,
        strength: f64,
    },

    /// An omnidirectional point source with inverse-distance falloff.
    Point {
        transform: Transform,
        color: Vec3,
        intensity: f64,
    },

    /// A small rectangular area source spanned by `u` and `v` about the
    /// transform's position, sampled at a uniformly random point each call.
    Area {
        transform: Transform,
        u: Vec3,
        v: Vec3,
        color: Vec3,
        intensity: f64,
    },
}

/// A single sample of incident radiance at a shade point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit direction from the shade point toward the light.
    pub wi: Vec3,
    /// World-space position the sample was taken at (or, for directional
    /// lights, the transform's position used for shadow-ray bookkeeping).
    pub pos: Vec3,
    /// Radiance arriving at the shade point along `-wi`.
    pub li: Vec3,
    /// Index of the light this sample came from, within the scene's light
    /// list.
    pub light_id: usize,
}

impl Light {
    pub fn sample(&self, light_id: usize, shade_point: Vec3, rng: &mut impl Rng) -> LightSample {
        match *self {
            Light::Directional {
                transform,
                color,
                strength,
            } => {
                let wi = transform.forward();
                LightSample {
                    wi,
                    pos: transform.position,
                    li: color * strength,
                    light_id,
                }
            }
            Light::Point {
                transform,
                color,
                intensity,
            } => {
                let to_light = transform.position - shade_point;
                let d = to_light.norm();
                LightSample {
                    wi: to_light.normalized(),
                    pos: transform.position,
                    li: color * (intensity / (d + FALLOFF_EPS)),
                    light_id,
                }
            }
            Light::Area {
                transform,
                u,
                v,
                color,
                intensity,
            } => {
                let su = rng.gen::<f64>() - 0.5;
                let sv = rng.gen::<f64>() - 0.5;
                let pos = transform.position + u * su + v * sv;

                let to_light = pos - shade_point;
                let d = to_light.norm();
                LightSample {
                    wi: to_light.normalized(),
                    pos,
                    li: color * (intensity / (d + FALLOFF_EPS)),
                    light_id,
                }
            }
        }
    }

    pub fn is_directional(&self) -> bool {
        matches!(self, Light::Directional { .. })
    }
}
