//! Distortion pedal (hard clip)
//!
//! Drive pushes the signal into a symmetric brick-wall ceiling, then a fixed
//! makeup of `0.5 / ceiling` brings the clipped square-ish wave back to a
//! steady level whatever the ceiling.

use serde::{Deserialize, Serialize};

use super::effect::{Pedal, ProcessContext};
use super::params::{param_map, ParamMap, ParamReader};
use super::safety;
use crate::error::{ParamError, Result};

/// Smallest usable ceiling; non-positive or NaN ceilings are raised to this
const MIN_CEILING: f32 = 1e-6;

/// Output level of a fully clipped signal before mixing
const CLIP_MAKEUP: f32 = 0.5;

/// Distortion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distortion {
    /// Pre-gain, >= 1
    pub drive: f32,
    /// Clipping ceiling, nominally (0, 1]
    pub threshold: f32,
    /// Dry/wet blend
    pub mix: f32,
}

impl Default for Distortion {
    fn default() -> Self {
        Self {
            drive: 10.0,
            threshold: 0.3,
            mix: 1.0,
        }
    }
}

impl Distortion {
    fn ceiling(&self) -> f32 {
        self.threshold.max(MIN_CEILING)
    }

    pub fn wet(&self, input: &[f32]) -> Vec<f32> {
        let ceiling = self.ceiling();
        let makeup = CLIP_MAKEUP / ceiling;
        input
            .iter()
            .map(|&x| (x * self.drive).max(-ceiling).min(ceiling) * makeup)
            .collect()
    }

    pub fn process(&self, input: &[f32]) -> Vec<f32> {
        safety::finish(input, &self.wet(input), self.mix)
    }
}

impl Pedal for Distortion {
    const NAME: &'static str = "Distortion";
    const PARAMS: &'static [&'static str] = &["drive", "threshold", "mix"];

    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError> {
        let reader = ParamReader::new(params, Self::PARAMS)?;
        let d = Self::default();
        Ok(Self {
            drive: reader.number("drive", d.drive)?,
            threshold: reader.number("threshold", d.threshold)?,
            mix: reader.number("mix", d.mix)?,
        })
    }

    fn to_params(&self) -> ParamMap {
        param_map([
            ("drive", self.drive),
            ("threshold", self.threshold),
            ("mix", self.mix),
        ])
    }

    fn apply(&self, input: &[f32], _ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        Ok(self.process(input))
    }
}
