use geo::pixelbuffer::PixelBuffer;
use geo::Vec3;

use crate::settings::ToneMapOp;

/// Below this luminance a pixel is treated as black, avoiding a division by
/// zero in the luminance-weighted operator.
const LUMINANCE_EPS: f64 = 1e-6;

/// Rec. 709 relative luminance weights.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// Apply `op` to every pixel in `buffer`, in place. Called once, after a
/// render finishes and before gamma correction.
pub fn apply(buffer: &mut PixelBuffer, op: ToneMapOp) {
    match op {
        ToneMapOp::ReinhardLuminance => reinhard_luminance(buffer),
        ToneMapOp::ReinhardPerChannel => reinhard_per_channel(buffer),
        ToneMapOp::None => {}
    }
}

/// Scale each pixel by `(Y / (1 + Y)) / Y`, preserving hue and saturation
/// while compressing the luminance channel into `[0, 1)`.
fn reinhard_luminance(buffer: &mut PixelBuffer) {
    for c in buffer.pixels_mut() {
        let y = luminance(*c);
        if y < LUMINANCE_EPS {
            continue;
        }
        let scale = (y / (1.0 + y)) / y;
        *c *= scale;
    }
}

/// The classic per-channel Reinhard operator, `c / (1 + c)`.
fn reinhard_per_channel(buffer: &mut PixelBuffer) {
    for c in buffer.pixels_mut() {
        *c = *c / (*c + 1.0);
    }
}

pub fn luminance(c: Vec3) -> f64 {
    LUMA_R * c.x + LUMA_G * c.y + LUMA_B * c.z
}

/// Gamma-correct every pixel as `pow(c, 1/gamma)`, clamping negative input
/// (which a physically-based pipeline shouldn't produce, but a buggy scene
/// might) to zero first.
pub fn gamma_correct(buffer: &mut PixelBuffer, gamma: f64) {
    let inv_gamma = 1.0 / gamma;
    for c in buffer.pixels_mut() {
        *c = Vec3::new(
            c.x.max(0.0).powf(inv_gamma),
            c.y.max(0.0).powf(inv_gamma),
            c.z.max(0.0).powf(inv_gamma),
        );
    }
}
