//! Overdrive pedal (tanh soft clip with a brightness tone control)

use serde::{Deserialize, Serialize};

use super::effect::{Pedal, ProcessContext};
use super::params::{param_map, ParamMap, ParamReader};
use super::safety;
use crate::error::{ParamError, Result};

/// Weight of the first-difference term at full tone
const BRIGHTNESS: f32 = 0.2;

/// Overdrive parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overdrive {
    /// Pre-gain into the waveshaper, >= 1
    pub gain: f32,
    /// Brightness emphasis, 0..1
    pub tone: f32,
    /// Dry/wet blend
    pub mix: f32,
}

impl Default for Overdrive {
    fn default() -> Self {
        Self {
            gain: 3.0,
            tone: 0.2,
            mix: 1.0,
        }
    }
}

impl Overdrive {
    pub fn wet(&self, input: &[f32]) -> Vec<f32> {
        let shaped: Vec<f32> = input.iter().map(|&x| (self.gain * x).tanh()).collect();
        if self.tone == 0.0 {
            return shaped;
        }

        // First difference with a leading zero keeps the length unchanged
        let mut prev = None;
        shaped
            .iter()
            .map(|&y| {
                let dx = prev.map_or(0.0, |p| y - p);
                prev = Some(y);
                (1.0 - self.tone) * y + self.tone * (y + BRIGHTNESS * dx)
            })
            .collect()
    }

    pub fn process(&self, input: &[f32]) -> Vec<f32> {
        safety::finish(input, &self.wet(input), self.mix)
    }
}

impl Pedal for Overdrive {
    const NAME: &'static str = "Overdrive";
    const PARAMS: &'static [&'static str] = &["gain", "tone", "mix"];

    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError> {
        let reader = ParamReader::new(params, Self::PARAMS)?;
        let d = Self::default();
        Ok(Self {
            gain: reader.number("gain", d.gain)?,
            tone: reader.number("tone", d.tone)?,
            mix: reader.number("mix", d.mix)?,
        })
    }

    fn to_params(&self) -> ParamMap {
        param_map([("gain", self.gain), ("tone", self.tone), ("mix", self.mix)])
    }

    fn apply(&self, input: &[f32], _ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        Ok(self.process(input))
    }
}
