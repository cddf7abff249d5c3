//! A single-shot, CPU-bound Monte Carlo path tracer: build a `Scene`, hand it
//! to `job::render` with a `RenderSettings`, then tone-map and write the
//! resulting `PixelBuffer` out as a PPM image.

pub mod actor;
pub mod atmosphere;
pub mod camera;
pub mod error;
pub mod geometry;
pub mod job;
pub mod light;
pub mod material;
pub mod pathtracer;
pub mod ppm;
pub mod scene;
pub mod settings;
pub mod tonemap;

mod util;

pub use error::{Error, Result};
pub use scene::Scene;
pub use settings::RenderSettings;
