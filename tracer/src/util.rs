use rand::Rng;

use geo::Vec3;

/// A vector with each component drawn uniformly from `[-1, 1]`, used to
/// perturb Lambertian and Metal bounce directions.
pub fn uniform_in_unit_cube(rng: &mut impl Rng) -> Vec3 {
    let x: f64 = rng.gen();
    let y: f64 = rng.gen();
    let z: f64 = rng.gen();

    Vec3::new(x, y, z) * 2.0 - 1.0
}
