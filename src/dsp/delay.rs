//! Delay pedal (feedback echo)
//!
//! A comb-filter recurrence over the whole buffer:
//!
//! ```text
//! y[n] = x[n] + feedback * y[n - D]    n >= D
//! y[n] = x[n]                          n <  D
//! ```
//!
//! Each output depends on an earlier *output*, so the loop must run in index
//! order. Feedback >= 1 grows without bound; only the final peak
//! normalization reins that in.

use serde::{Deserialize, Serialize};

use super::effect::{Pedal, ProcessContext};
use super::params::{param_map, ParamMap, ParamReader};
use super::safety;
use crate::error::{ParamError, Result};

/// Delay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delay {
    /// Echo spacing in milliseconds
    pub delay_ms: f32,
    /// Feedback amount, stable below 1.0
    pub feedback: f32,
    /// Dry/wet blend
    pub mix: f32,
}

impl Default for Delay {
    fn default() -> Self {
        Self {
            delay_ms: 300.0,
            feedback: 0.4,
            mix: 0.3,
        }
    }
}

impl Delay {
    /// Echo spacing in whole samples, never less than one
    pub fn delay_samples(&self, sample_rate: u32) -> usize {
        let samples = (sample_rate as f64 * self.delay_ms as f64 / 1000.0).round();
        // `as usize` saturates negatives and NaN to zero
        (samples as usize).max(1)
    }

    pub fn wet(&self, input: &[f32], sample_rate: u32) -> Vec<f32> {
        let d = self.delay_samples(sample_rate);
        let feedback = self.feedback;
        let mut y = Vec::with_capacity(input.len());
        for (n, &x) in input.iter().enumerate() {
            let echo = if n >= d { feedback * y[n - d] } else { 0.0 };
            y.push(x + echo);
        }
        y
    }

    pub fn process(&self, input: &[f32], sample_rate: u32) -> Vec<f32> {
        safety::finish(input, &self.wet(input, sample_rate), self.mix)
    }
}

impl Pedal for Delay {
    const NAME: &'static str = "Delay";
    const PARAMS: &'static [&'static str] = &["delay_ms", "feedback", "mix"];

    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError> {
        let reader = ParamReader::new(params, Self::PARAMS)?;
        let d = Self::default();
        Ok(Self {
            delay_ms: reader.number("delay_ms", d.delay_ms)?,
            feedback: reader.number("feedback", d.feedback)?,
            mix: reader.number("mix", d.mix)?,
        })
    }

    fn to_params(&self) -> ParamMap {
        param_map([
            ("delay_ms", self.delay_ms),
            ("feedback", self.feedback),
            ("mix", self.mix),
        ])
    }

    fn apply(&self, input: &[f32], ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        Ok(self.process(input, ctx.sample_rate))
    }
}
