use crate::error::{Error, Result};

/// Which tone-mapping operator to apply to a finished render before gamma
/// correction. The documented default (see DESIGN.md) is luminance Reinhard
/// followed by `pow(1/2.2)` gamma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneMapOp {
    /// Scale every pixel by its own luminance-weighted Reinhard factor.
    ReinhardLuminance,
    /// Apply the per-channel Reinhard operator `c / (1 + c)`.
    ReinhardPerChannel,
    /// Skip tone mapping entirely; only gamma-correct.
    None,
}

/// Collects every knob the renderer needs, mirroring `buzz::RenderConfig` in
/// spirit: one plain struct constructed once in `main` and validated before
/// a render starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Samples per pixel (jittered supersampling).
    pub samples: u32,
    /// Maximum recursion depth for secondary rays.
    pub max_bounces: u32,
    /// Number of worker threads; clamped to hardware parallelism.
    pub thread_count: usize,
    /// Height, in pixels, of a single stripe task.
    pub stripe_height: u32,
    /// Root seed used to derive each per-pixel RNG stream.
    pub seed: u64,
    /// Tone-mapping operator applied after rendering.
    pub tone_map: ToneMapOp,
    /// Gamma exponent applied as `pow(c, 1/gamma)`.
    pub gamma: f64,
}

impl RenderSettings {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        if self.samples == 0 {
            return Err(Error::Config("samples must be at least 1".to_string()));
        }

        if self.stripe_height == 0 {
            return Err(Error::Config("stripe_height must be at least 1".to_string()));
        }

        if self.thread_count == 0 {
            return Err(Error::Config("thread_count must be at least 1".to_string()));
        }

        if self.gamma <= 0.0 {
            return Err(Error::Config(format!(
                "gamma must be positive, got {}",
                self.gamma
            )));
        }

        Ok(())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: 400,
            height: 225,
            samples: 32,
            max_bounces: 8,
            thread_count: 4,
            stripe_height: 10,
            seed: 0,
            tone_map: ToneMapOp::ReinhardLuminance,
            gamma: 2.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_resolution() {
        let mut s = RenderSettings::default();
        s.width = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_samples() {
        let mut s = RenderSettings::default();
        s.samples = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(RenderSettings::default().validate().is_ok());
    }
}
