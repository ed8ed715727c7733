//! Reverb pedal (convolution)
//!
//! Convolves the input with a recorded impulse response. The response is
//! fetched through the context's [`ImpulseSource`](super::impulse::ImpulseSource),
//! optionally prefixed with silence for pre-delay, and the convolution tail
//! past the input's length is dropped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::convolution::convolve_truncated;
use super::effect::{Pedal, ProcessContext};
use super::params::{param_map, ParamMap, ParamReader};
use super::safety;
use crate::error::{ParamError, Result};

/// Impulse response used when none is configured
pub const DEFAULT_IR_PATH: &str = "assets/impulse_responses/room.wav";

/// Reverb parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reverb {
    /// WAV file holding the impulse response
    pub ir_path: String,
    /// Dry/wet blend
    pub mix: f32,
    /// Silence inserted before the response, in milliseconds
    pub pre_delay_ms: f32,
}

impl Default for Reverb {
    fn default() -> Self {
        Self {
            ir_path: DEFAULT_IR_PATH.to_string(),
            mix: 0.3,
            pre_delay_ms: 0.0,
        }
    }
}

impl Reverb {
    /// Pre-delay length in samples
    pub fn pre_delay_samples(&self, sample_rate: u32) -> usize {
        if self.pre_delay_ms > 0.0 {
            (sample_rate as f64 * self.pre_delay_ms as f64 / 1000.0).round() as usize
        } else {
            0
        }
    }

    /// The impulse response at the working rate, including pre-delay, cut to
    /// at most `max_len` samples
    pub fn impulse_response(&self, ctx: &ProcessContext<'_>, max_len: usize) -> Result<Vec<f32>> {
        let ir = ctx
            .impulses
            .load(Path::new(&self.ir_path), ctx.sample_rate)?;
        let silence = self.pre_delay_samples(ctx.sample_rate).min(max_len);
        let taps = ir.len().min(max_len - silence);
        let mut delayed = Vec::with_capacity(silence + taps);
        delayed.resize(silence, 0.0);
        delayed.extend_from_slice(&ir[..taps]);
        Ok(delayed)
    }

    pub fn process(&self, input: &[f32], ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        // Nothing past the input's length reaches the output
        let ir = self.impulse_response(ctx, input.len())?;
        let wet = convolve_truncated(input, &ir);
        Ok(safety::finish(input, &wet, self.mix))
    }
}

impl Pedal for Reverb {
    const NAME: &'static str = "Reverb";
    const PARAMS: &'static [&'static str] = &["ir_path", "mix", "pre_delay_ms"];

    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError> {
        let reader = ParamReader::new(params, Self::PARAMS)?;
        let d = Self::default();
        Ok(Self {
            ir_path: reader.text("ir_path", &d.ir_path)?,
            mix: reader.number("mix", d.mix)?,
            pre_delay_ms: reader.number("pre_delay_ms", d.pre_delay_ms)?,
        })
    }

    fn to_params(&self) -> ParamMap {
        let mut params = param_map([("mix", self.mix), ("pre_delay_ms", self.pre_delay_ms)]);
        params.insert("ir_path".to_string(), self.ir_path.as_str().into());
        params
    }

    fn apply(&self, input: &[f32], ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        self.process(input, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::impulse::ImpulseSource;
    use crate::error::StompboxError;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    /// Serves a fixed response regardless of path
    struct FixedImpulse(Vec<f32>);

    impl ImpulseSource for FixedImpulse {
        fn load(&self, _path: &Path, _working_rate: u32) -> Result<Arc<[f32]>> {
            Ok(self.0.clone().into())
        }
    }

    #[test]
    fn test_pre_delay_prefixes_silence() {
        let source = FixedImpulse(vec![1.0, 0.5]);
        let ctx = ProcessContext::new(1000, &source);
        let reverb = Reverb {
            pre_delay_ms: 3.0,
            ..Reverb::default()
        };
        assert_eq!(
            reverb.impulse_response(&ctx, 16).unwrap(),
            vec![0.0, 0.0, 0.0, 1.0, 0.5]
        );
        assert_eq!(
            reverb.impulse_response(&ctx, 4).unwrap(),
            vec![0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_pre_delay_past_input_is_silent() {
        let source = FixedImpulse(vec![1.0; 64]);
        let ctx = ProcessContext::new(44100, &source);
        let reverb = Reverb {
            mix: 1.0,
            pre_delay_ms: 20_000.0,
            ..Reverb::default()
        };
        assert_eq!(reverb.impulse_response(&ctx, 4).unwrap(), vec![0.0; 4]);

        let out = reverb.process(&[0.5, -0.5, 0.25, 0.1], &ctx).unwrap();
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn test_wet_is_convolution() {
        let source = FixedImpulse(vec![0.5, 0.25]);
        let ctx = ProcessContext::new(1000, &source);
        let reverb = Reverb {
            mix: 1.0,
            ..Reverb::default()
        };
        let out = reverb.process(&[1.0, 0.0, 0.0], &ctx).unwrap();
        assert_eq!(out.len(), 3);
        assert_relative_eq!(out[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(out[1], 0.25, epsilon = 1e-6);
        assert_relative_eq!(out[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_ir_is_fatal() {
        let reverb = Reverb {
            ir_path: "does/not/exist.wav".to_string(),
            ..Reverb::default()
        };
        let ctx = ProcessContext::offline(44100);
        let err = reverb.process(&[0.1, 0.2], &ctx).unwrap_err();
        assert!(matches!(err, StompboxError::ImpulseResponseLoad { .. }));
    }

    #[test]
    fn test_ir_path_must_be_text() {
        let params = param_map([("ir_path", 3.0)]);
        assert!(matches!(
            Reverb::from_params(&params),
            Err(ParamError::WrongType { .. })
        ));
    }
}
