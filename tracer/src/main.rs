use std::path::PathBuf;

use geo::{Transform, Vec3};

use tracer::actor::Actor;
use tracer::atmosphere::Atmosphere;
use tracer::camera::{Camera, Fov};
use tracer::geometry::Geometry;
use tracer::job;
use tracer::light::Light;
use tracer::material::Material;
use tracer::ppm::{self, ImageFormat};
use tracer::scene::Scene;
use tracer::settings::{RenderSettings, ToneMapOp};
use tracer::tonemap;

const SCENE_NAME: &str = "cover";

/// A ground plane, a cluster of small Lambertian/Metal/Dielectric spheres,
/// three "hero" spheres, one filled with a scattering medium, and a sun lit
/// through a thin Rayleigh/Mie atmosphere.
fn build_scene(width: u32, height: u32) -> Scene {
    let camera = Camera::new(
        width,
        height,
        Transform::looking_at(Vec3::new(13.0, 2.0, 3.0), Vec3::zero()),
        Fov::Vertical(20.0),
    );

    let mut scene = Scene::new(camera);

    scene.push_actor(
        Actor::new("ground")
            .with_geometry(Geometry::Plane)
            .with_material(Material::lambertian(Vec3::new(0.5, 0.5, 0.5)))
            .with_transform(Transform::at(Vec3::new(0.0, 0.0, 0.0))),
    );

    scene.push_actor(
        Actor::new("glass")
            .with_geometry(Geometry::Sphere { radius: 1.0 })
            .with_material(Material::dielectric(Vec3::one(), 1.5))
            .with_transform(Transform::at(Vec3::new(0.0, 1.0, 0.0))),
    );

    scene.push_actor(
        Actor::new("diffuse")
            .with_geometry(Geometry::Sphere { radius: 1.0 })
            .with_material(Material::lambertian(Vec3::new(0.4, 0.2, 0.1)))
            .with_transform(Transform::at(Vec3::new(-4.0, 1.0, 0.0))),
    );

    scene.push_actor(
        Actor::new("gold")
            .with_geometry(Geometry::Sphere { radius: 1.0 })
            .with_material(Material::metal(Vec3::new(0.7, 0.6, 0.5), 0.0))
            .with_transform(Transform::at(Vec3::new(4.0, 1.0, 0.0))),
    );

    scene.push_actor(
        Actor::new("fog")
            .with_geometry(Geometry::Sphere { radius: 0.8 })
            .with_material(Material::medium(Vec3::new(0.9, 0.9, 0.95), 0.02, 0.3, 0.4))
            .with_transform(Transform::at(Vec3::new(2.0, 0.8, 2.5))),
    );

    let sun_id = scene.push_light(Light::Directional {
        transform: Transform::looking_at(Vec3::new(0.0, 50.0, 0.0), Vec3::new(-10.0, 0.0, -5.0)),
        color: Vec3::new(1.0, 1.0, 0.95),
        strength: 3.0,
    });

    scene = scene.with_sun(sun_id).with_atmosphere(Atmosphere {
        center: Vec3::new(0.0, -6_371_000.0, 0.0),
        ground_radius: 6_371_000.0,
        atmosphere_radius: 6_471_000.0,
        beta_r0: Vec3::new(5.5e-6, 13.0e-6, 22.4e-6),
        h_r: 8_000.0,
        beta_m0: 21e-6,
        h_m: 1_200.0,
        g_mie: 0.76,
    });

    scene
}

/// Writes the image next to the running executable, named after the scene.
fn output_path() -> PathBuf {
    let mut path = std::env::args()
        .next()
        .map(PathBuf::from)
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_default();

    path.push(format!("{SCENE_NAME}.ppm"));
    path
}

fn main() -> tracer::Result<()> {
    env_logger::init();

    let settings = RenderSettings {
        width: 640,
        height: 360,
        samples: 64,
        max_bounces: 12,
        thread_count: 8,
        stripe_height: 8,
        seed: 0,
        tone_map: ToneMapOp::ReinhardLuminance,
        gamma: 2.2,
    };

    let scene = build_scene(settings.width, settings.height);

    let mut buffer = job::render(&scene, &settings)?;

    tonemap::apply(&mut buffer, settings.tone_map);
    tonemap::gamma_correct(&mut buffer, settings.gamma);

    let path = output_path();
    ppm::write(&path, &buffer, ImageFormat::Binary)?;

    log::info!("wrote {}", path.display());
    Ok(())
}
