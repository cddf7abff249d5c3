use rand::Rng;

use geo::ray::Ray;
use geo::Vec3;

use crate::actor::{Actor, Hit};
use crate::atmosphere::Atmosphere;
use crate::camera::Camera;
use crate::light::{Light, LightSample};

/// An ordered collection of actors and lights, an optional atmosphere, and
/// exactly one camera. Built once before rendering starts and never mutated
/// while a render is in flight, so it's shared read-only across workers.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub actors: Vec<Actor>,
    pub lights: Vec<Light>,
    pub atmosphere: Option<Atmosphere>,
    pub camera: Camera,
    /// Index into `lights` of the directional light treated as the sun,
    /// i.e. the one whose direction and radiance feed the atmosphere's sky
    /// gradient when no actor is hit. At most one light is marked this way.
    pub sun: Option<usize>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Scene {
            actors: Vec::new(),
            lights: Vec::new(),
            atmosphere: None,
            camera,
            sun: None,
        }
    }

    pub fn with_atmosphere(mut self, atmosphere: Atmosphere) -> Self {
        self.atmosphere = Some(atmosphere);
        self
    }

    pub fn with_sun(mut self, sun: usize) -> Self {
        self.sun = Some(sun);
        self
    }

    pub fn push_actor(&mut self, actor: Actor) -> usize {
        self.actors.push(actor);
        self.actors.len() - 1
    }

    pub fn push_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// The sky seen along a ray that hits nothing: a two-colour gradient by
    /// default, replaced by the atmosphere's Rayleigh/Mie sky colour when
    /// the scene has both an atmosphere and a marked sun.
    pub fn background(&self, ray: &Ray) -> Vec3 {
        if let Some(atmosphere) = &self.atmosphere {
            if let Some(sun_id) = self.sun {
                if let Light::Directional {
                    transform,
                    color,
                    strength,
                } = self.lights[sun_id]
                {
                    return atmosphere.sky_color(ray, transform.forward(), color * strength);
                }
            }
        }

        let t = 0.5 * (ray.dir.y + 1.0);
        geo::vec3::lerp(Vec3::one(), Vec3::new(0.5, 0.7, 1.0), t)
    }

    /// Closest-hit across every actor. Ties (equal `distance`) are broken
    /// by actor insertion order — the source leaves this unspecified (see
    /// DESIGN.md), so the first-inserted actor wins.
    pub fn intersect_closest(&self, ray: &Ray) -> Option<Hit> {
        let mut best: Option<Hit> = None;

        for (actor_index, actor) in self.actors.iter().enumerate() {
            if let Some(geom) = actor.intersect(ray) {
                let is_better = match &best {
                    None => true,
                    Some(b) => geom.distance < b.geom.distance,
                };

                if is_better {
                    best = Some(Hit { geom, actor_index });
                }
            }
        }

        best
    }

    /// Sample every light from shade point `p`, appending unoccluded
    /// samples to `bundle`. When the scene has an atmosphere, a directional
    /// light's radiance is replaced by the atmospheric sky color along the
    /// shadow ray (the sun is assumed to sit outside the atmosphere shell;
    /// point/area lights are assumed to sit inside it).
    pub fn intersect_lights(&self, p: Vec3, rng: &mut impl Rng, bundle: &mut Vec<LightSample>) {
        for (light_id, light) in self.lights.iter().enumerate() {
            let mut sample = light.sample(light_id, p, rng);

            let to_light = (sample.pos - p).norm();
            let shadow_ray = Ray::new(p, sample.wi);

            let occluded = self
                .actors
                .iter()
                .any(|a| matches!(a.intersect(&shadow_ray), Some(h) if h.distance < to_light));

            if occluded {
                continue;
            }

            if let (Some(atmosphere), true) = (&self.atmosphere, light.is_directional()) {
                sample.li = atmosphere.sky_color(&shadow_ray, sample.wi, sample.li);
            }

            bundle.push(sample);
        }
    }
}
