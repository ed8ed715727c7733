//! Audio buffer implementation
//!
//! `AudioBuffer` is the mono sample container every pedal reads from and every
//! chain hands back. Stages never mutate a caller's buffer; they return new
//! sample vectors that the chain wraps into a fresh buffer.

use std::f64::consts::PI;

/// Sample rate used by the demo tone and the CLI when no file is given
pub const DEMO_SAMPLE_RATE: u32 = 44100;

/// Mono audio samples with their sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Samples, nominally in -1.0..1.0
    samples: Vec<f32>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wrap existing samples
    ///
    /// Empty buffers are allowed; every stage preserves length, so an empty
    /// input simply yields an empty output.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a silent buffer with the given duration
    pub fn silence(duration_secs: f32, sample_rate: u32) -> Self {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        Self {
            samples: vec![0.0; num_samples],
            sample_rate,
        }
    }

    /// Create a sine wave test tone with the given peak amplitude
    pub fn sine_wave(frequency: f32, amplitude: f32, duration_secs: f32, sample_rate: u32) -> Self {
        let num_samples = (duration_secs as f64 * sample_rate as f64) as usize;
        let samples = (0..num_samples)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (amplitude as f64 * (2.0 * PI * frequency as f64 * t).sin()) as f32
            })
            .collect();

        Self {
            samples,
            sample_rate,
        }
    }

    /// The demo input: a 0.4-amplitude 440 Hz sine lasting two seconds
    pub fn demo_tone() -> Self {
        Self::sine_wave(440.0, 0.4, 2.0, DEMO_SAMPLE_RATE)
    }

    /// Get a reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Largest absolute sample value (0.0 for an empty buffer)
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
    }

    /// Root-mean-square level (0.0 for an empty buffer)
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.samples.iter().map(|&s| (s as f64).powi(2)).sum();
        (sum_sq / self.samples.len() as f64).sqrt() as f32
    }

    /// Leading window of at most `secs` seconds
    pub fn head(&self, secs: f32) -> &[f32] {
        let n = ((secs as f64 * self.sample_rate as f64) as usize).min(self.samples.len());
        &self.samples[..n]
    }

    /// Check if buffers are identical (bit-perfect comparison)
    pub fn is_identical_to(&self, other: &AudioBuffer) -> bool {
        self.sample_rate == other.sample_rate && self.samples == other.samples
    }

    /// Check if buffers are approximately equal within tolerance
    pub fn is_approx_equal(&self, other: &AudioBuffer, tolerance: f32) -> bool {
        if self.sample_rate != other.sample_rate || self.samples.len() != other.samples.len() {
            return false;
        }
        self.samples
            .iter()
            .zip(other.samples.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}
