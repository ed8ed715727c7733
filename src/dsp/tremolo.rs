//! Tremolo pedal (amplitude modulation by a sine LFO)

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::effect::{Pedal, ProcessContext};
use super::params::{param_map, ParamMap, ParamReader};
use super::safety;
use crate::error::{ParamError, Result};

/// Tremolo parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tremolo {
    /// LFO rate in Hz
    pub rate: f32,
    /// Modulation depth: 0 leaves the level alone, 1 swings from silence to full
    pub depth: f32,
    /// Dry/wet blend
    pub mix: f32,
}

impl Default for Tremolo {
    fn default() -> Self {
        Self {
            rate: 5.0,
            depth: 0.5,
            mix: 1.0,
        }
    }
}

impl Tremolo {
    /// Gain applied at sample `n`: `(1 - depth) + depth * lfo[n]`, lfo in 0..1
    #[inline]
    pub fn gain_at(&self, n: usize, sample_rate: u32) -> f64 {
        let t = n as f64 / sample_rate as f64;
        let lfo = 0.5 * (1.0 + (TAU * self.rate as f64 * t).sin());
        let depth = self.depth as f64;
        (1.0 - depth) + depth * lfo
    }

    pub fn wet(&self, input: &[f32], sample_rate: u32) -> Vec<f32> {
        input
            .iter()
            .enumerate()
            .map(|(n, &x)| (x as f64 * self.gain_at(n, sample_rate)) as f32)
            .collect()
    }

    pub fn process(&self, input: &[f32], sample_rate: u32) -> Vec<f32> {
        safety::finish(input, &self.wet(input, sample_rate), self.mix)
    }
}

impl Pedal for Tremolo {
    const NAME: &'static str = "Tremolo";
    const PARAMS: &'static [&'static str] = &["rate", "depth", "mix"];

    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError> {
        let reader = ParamReader::new(params, Self::PARAMS)?;
        let d = Self::default();
        Ok(Self {
            rate: reader.number("rate", d.rate)?,
            depth: reader.number("depth", d.depth)?,
            mix: reader.number("mix", d.mix)?,
        })
    }

    fn to_params(&self) -> ParamMap {
        param_map([("rate", self.rate), ("depth", self.depth), ("mix", self.mix)])
    }

    fn apply(&self, input: &[f32], ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        Ok(self.process(input, ctx.sample_rate))
    }
}
