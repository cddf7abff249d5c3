use geo::Vec3;

/// A tagged variant over every shading model this tracer knows how to
/// dispatch on a closest-hit. Every variant is a plain bag of read-only
/// parameters; there's no shared state between shades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Purely indirect diffuse reflectance; no direct-light term.
    Lambertian { albedo: Vec3 },

    /// Mirror-like reflectance perturbed by `fuzziness` (0 = perfect mirror).
    Metal { attenuation: Vec3, fuzziness: f64 },

    /// Transparent surface that both reflects and refracts, weighted by the
    /// Fresnel equations.
    Dielectric { attenuation: Vec3, ior: f64 },

    /// A homogeneous participating medium filling the actor's geometry.
    Medium {
        color: Vec3,
        sigma_a: f64,
        sigma_s: f64,
        g: f64,
    },
}

impl Material {
    pub fn lambertian(albedo: Vec3) -> Self {
        Material::Lambertian { albedo }
    }

    pub fn metal(attenuation: Vec3, fuzziness: f64) -> Self {
        Material::Metal {
            attenuation,
            fuzziness: fuzziness.max(0.0),
        }
    }

    pub fn dielectric(attenuation: Vec3, ior: f64) -> Self {
        Material::Dielectric { attenuation, ior }
    }

    pub fn medium(color: Vec3, sigma_a: f64, sigma_s: f64, g: f64) -> Self {
        Material::Medium {
            color,
            sigma_a: sigma_a.max(0.0),
            sigma_s: sigma_s.max(0.0),
            g: g.clamp(-1.0, 1.0),
        }
    }

    /// Total extinction coefficient `sigma_a + sigma_s`, meaningful only for
    /// `Medium`.
    pub fn sigma_t(&self) -> f64 {
        match *self {
            Material::Medium {
                sigma_a, sigma_s, ..
            } => sigma_a + sigma_s,
            _ => 0.0,
        }
    }
}
