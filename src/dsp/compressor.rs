//! Compressor pedal
//!
//! Static, sample-by-sample compression: anything at or above the threshold is
//! pulled toward it by the ratio, there is no envelope follower and no knee.
//!
//! ```text
//! y = x                                  |x| <  T
//! y = sign(x) * (T + (|x| - T) / R)      |x| >= T
//! ```

use serde::{Deserialize, Serialize};

use super::effect::{Pedal, ProcessContext};
use super::params::{param_map, ParamMap, ParamReader};
use super::safety;
use crate::error::{ParamError, Result};

/// Compressor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compressor {
    /// Amplitude threshold T, nominally (0, 1]
    pub threshold: f32,
    /// Compression ratio R >= 1; large values approach hard limiting at T
    pub ratio: f32,
    /// Linear makeup gain applied to the whole compressed signal
    pub makeup: f32,
    /// Dry/wet blend
    pub mix: f32,
}

impl Default for Compressor {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            ratio: 4.0,
            makeup: 1.0,
            mix: 1.0,
        }
    }
}

impl Compressor {
    /// Static gain curve for a single sample
    #[inline]
    pub fn compress_sample(&self, x: f32) -> f32 {
        let mag = x.abs();
        if mag < self.threshold {
            x
        } else {
            sign(x) * (self.threshold + (mag - self.threshold) / self.ratio)
        }
    }

    /// The compressed signal before mixing and normalization
    pub fn wet(&self, input: &[f32]) -> Vec<f32> {
        input
            .iter()
            .map(|&x| self.compress_sample(x) * self.makeup)
            .collect()
    }

    pub fn process(&self, input: &[f32]) -> Vec<f32> {
        safety::finish(input, &self.wet(input), self.mix)
    }
}

/// Sign with sign(0) = 0
#[inline]
fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Pedal for Compressor {
    const NAME: &'static str = "Compressor";
    const PARAMS: &'static [&'static str] = &["threshold", "ratio", "makeup", "mix"];

    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError> {
        let reader = ParamReader::new(params, Self::PARAMS)?;
        let d = Self::default();
        Ok(Self {
            threshold: reader.number("threshold", d.threshold)?,
            ratio: reader.number("ratio", d.ratio)?,
            makeup: reader.number("makeup", d.makeup)?,
            mix: reader.number("mix", d.mix)?,
        })
    }

    fn to_params(&self) -> ParamMap {
        param_map([
            ("threshold", self.threshold),
            ("ratio", self.ratio),
            ("makeup", self.makeup),
            ("mix", self.mix),
        ])
    }

    fn apply(&self, input: &[f32], _ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        Ok(self.process(input))
    }
}
