//! Chorus pedal
//!
//! A single modulated delay line. The read position trails the write position
//! by a 15 ms base delay swept by a sine LFO of `depth_ms`; fractional
//! positions are linearly interpolated. Read positions that fall outside the
//! buffer are clamped to its edges.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::effect::{Pedal, ProcessContext};
use super::params::{param_map, ParamMap, ParamReader};
use super::safety;
use crate::error::{ParamError, Result};

/// Centre of the delay sweep in milliseconds
pub const BASE_DELAY_MS: f64 = 15.0;

/// Chorus parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chorus {
    /// LFO rate in Hz
    pub rate: f32,
    /// Sweep depth in milliseconds either side of the base delay
    pub depth_ms: f32,
    /// Dry/wet blend
    pub mix: f32,
}

impl Default for Chorus {
    fn default() -> Self {
        Self {
            rate: 1.5,
            depth_ms: 2.0,
            mix: 0.5,
        }
    }
}

impl Chorus {
    /// Delay in samples at output index `n`
    #[inline]
    pub fn delay_samples(&self, n: usize, sample_rate: u32) -> f64 {
        let sr = sample_rate as f64;
        let t = n as f64 / sr;
        let delay_ms = BASE_DELAY_MS + self.depth_ms as f64 * (TAU * self.rate as f64 * t).sin();
        delay_ms * sr / 1000.0
    }

    pub fn wet(&self, input: &[f32], sample_rate: u32) -> Vec<f32> {
        let len = input.len();
        // Interpolation needs a neighbour pair
        if len < 2 {
            return input.to_vec();
        }
        let last_pair = (len - 2) as f64;

        (0..len)
            .map(|n| {
                let read = (n as f64 - self.delay_samples(n, sample_rate))
                    .max(0.0)
                    .min(last_pair);
                let floor = read as usize;
                let frac = read - floor as f64;
                ((1.0 - frac) * input[floor] as f64 + frac * input[floor + 1] as f64) as f32
            })
            .collect()
    }

    pub fn process(&self, input: &[f32], sample_rate: u32) -> Vec<f32> {
        safety::finish(input, &self.wet(input, sample_rate), self.mix)
    }
}

impl Pedal for Chorus {
    const NAME: &'static str = "Chorus";
    const PARAMS: &'static [&'static str] = &["rate", "depth_ms", "mix"];

    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError> {
        let reader = ParamReader::new(params, Self::PARAMS)?;
        let d = Self::default();
        Ok(Self {
            rate: reader.number("rate", d.rate)?,
            depth_ms: reader.number("depth_ms", d.depth_ms)?,
            mix: reader.number("mix", d.mix)?,
        })
    }

    fn to_params(&self) -> ParamMap {
        param_map([
            ("rate", self.rate),
            ("depth_ms", self.depth_ms),
            ("mix", self.mix),
        ])
    }

    fn apply(&self, input: &[f32], ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        Ok(self.process(input, ctx.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_static_delay_shifts_signal() {
        // Zero depth gives a fixed 15 ms (15 samples at 1 kHz) delay
        let chorus = Chorus {
            rate: 1.0,
            depth_ms: 0.0,
            mix: 1.0,
        };
        let input: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
        let wet = chorus.wet(&input, 1000);
        for n in 15..64 {
            assert_relative_eq!(wet[n], input[n - 15], epsilon = 1e-6);
        }
        // Reads before the start clamp to the first sample
        assert_eq!(wet[0], input[0]);
        assert_eq!(wet[14], input[0]);
    }

    #[test]
    fn test_fractional_delay_interpolates() {
        let chorus = Chorus {
            rate: 0.0,
            depth_ms: 0.0,
            mix: 1.0,
        };
        // 15 ms at 1100 Hz = 16.5 samples
        let input: Vec<f32> = (0..40).map(|i| i as f32).collect();
        let wet = chorus.wet(&input, 1100);
        assert_relative_eq!(wet[30], 13.5, epsilon = 1e-4);
    }

    #[test]
    fn test_tiny_buffers() {
        let chorus = Chorus::default();
        assert!(chorus.process(&[], 44100).is_empty());
        assert_eq!(chorus.process(&[0.5], 44100), vec![0.5]);
        assert_eq!(chorus.process(&[0.5, -0.5], 44100).len(), 2);
    }
}
