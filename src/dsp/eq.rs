//! Equalizer pedal (3-band)
//!
//! Splits the signal with a 2nd-order Butterworth low-pass at 400 Hz and a
//! 2nd-order Butterworth high-pass at 3 kHz. The mid band is whatever is left:
//! `mid = x - (low + high)`. The two filters are not exactly complementary, so
//! unity gains on all three bands are close to, but not exactly, flat.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use super::effect::{Pedal, ProcessContext};
use super::params::{param_map, ParamMap, ParamReader};
use super::safety;
use crate::error::{ParamError, Result};

/// Low/mid crossover in Hz
pub const LOW_CUT_HZ: f64 = 400.0;

/// Mid/high crossover in Hz
pub const HIGH_CUT_HZ: f64 = 3000.0;

/// Butterworth Q for a single 2nd-order section
const BUTTERWORTH_Q: f64 = FRAC_1_SQRT_2;

/// Filter shapes used by the band split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterType {
    LowPass,
    HighPass,
}

/// Biquad filter coefficients
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy, Default)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoeffs {
    /// Bilinear-transform Butterworth section (Audio EQ Cookbook with Q = 1/sqrt(2))
    fn butterworth(filter_type: FilterType, sample_rate: f64, frequency: f64) -> Self {
        // Keep the corner strictly inside (0, Nyquist)
        let nyquist = sample_rate / 2.0;
        let freq = frequency.min(nyquist * 0.999).max(1e-3);

        let w0 = 2.0 * PI * freq / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * BUTTERWORTH_Q);

        let (b0, b1, b2) = match filter_type {
            FilterType::LowPass => ((1.0 - cos_w0) / 2.0, 1.0 - cos_w0, (1.0 - cos_w0) / 2.0),
            FilterType::HighPass => ((1.0 + cos_w0) / 2.0, -(1.0 + cos_w0), (1.0 + cos_w0) / 2.0),
        };
        let a0 = 1.0 + alpha;

        BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Run the whole signal through the filter from a zero state
    fn filter(&self, input: &[f32]) -> Vec<f64> {
        let mut state = BiquadState::default();
        input
            .iter()
            .map(|&x| state.process(x as f64, self))
            .collect()
    }
}

/// Transposed direct form II state
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    z1: f64,
    z2: f64,
}

impl BiquadState {
    #[inline]
    fn process(&mut self, input: f64, c: &BiquadCoeffs) -> f64 {
        let output = c.b0 * input + self.z1;
        self.z1 = c.b1 * input - c.a1 * output + self.z2;
        self.z2 = c.b2 * input - c.a2 * output;
        output
    }
}

/// Equalizer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equalizer {
    /// Gain for the band below 400 Hz, nominally 0..2
    pub low_gain: f32,
    /// Gain for the residual mid band, nominally 0..2
    pub mid_gain: f32,
    /// Gain for the band above 3 kHz, nominally 0..2
    pub high_gain: f32,
    /// Dry/wet blend; normally left at 1.0
    pub mix: f32,
}

impl Default for Equalizer {
    fn default() -> Self {
        Self {
            low_gain: 1.0,
            mid_gain: 1.0,
            high_gain: 1.0,
            mix: 1.0,
        }
    }
}

/// The three bands of a split signal
#[derive(Debug, Clone)]
pub struct Bands {
    pub low: Vec<f64>,
    pub mid: Vec<f64>,
    pub high: Vec<f64>,
}

/// Split `input` into low, mid and high bands at the working sample rate
pub fn split_bands(input: &[f32], sample_rate: u32) -> Bands {
    let sr = sample_rate as f64;
    let low = BiquadCoeffs::butterworth(FilterType::LowPass, sr, LOW_CUT_HZ).filter(input);
    let high = BiquadCoeffs::butterworth(FilterType::HighPass, sr, HIGH_CUT_HZ).filter(input);
    let mid = input
        .iter()
        .zip(low.iter().zip(&high))
        .map(|(&x, (&l, &h))| x as f64 - (l + h))
        .collect();
    Bands { low, mid, high }
}

impl Equalizer {
    pub fn wet(&self, input: &[f32], sample_rate: u32) -> Vec<f32> {
        let bands = split_bands(input, sample_rate);
        let (lg, mg, hg) = (
            self.low_gain as f64,
            self.mid_gain as f64,
            self.high_gain as f64,
        );
        bands
            .low
            .iter()
            .zip(&bands.mid)
            .zip(&bands.high)
            .map(|((&l, &m), &h)| (lg * l + mg * m + hg * h) as f32)
            .collect()
    }

    pub fn process(&self, input: &[f32], sample_rate: u32) -> Vec<f32> {
        safety::finish(input, &self.wet(input, sample_rate), self.mix)
    }
}

impl Pedal for Equalizer {
    const NAME: &'static str = "Equalizer";
    const PARAMS: &'static [&'static str] = &["low_gain", "mid_gain", "high_gain", "mix"];

    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError> {
        let reader = ParamReader::new(params, Self::PARAMS)?;
        let d = Self::default();
        Ok(Self {
            low_gain: reader.number("low_gain", d.low_gain)?,
            mid_gain: reader.number("mid_gain", d.mid_gain)?,
            high_gain: reader.number("high_gain", d.high_gain)?,
            mix: reader.number("mix", d.mix)?,
        })
    }

    fn to_params(&self) -> ParamMap {
        param_map([
            ("low_gain", self.low_gain),
            ("mid_gain", self.mid_gain),
            ("high_gain", self.high_gain),
            ("mix", self.mix),
        ])
    }

    fn apply(&self, input: &[f32], ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        Ok(self.process(input, ctx.sample_rate))
    }
}
