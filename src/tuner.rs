//! Tuner
//!
//! Fundamental-frequency estimation with the YIN algorithm and mapping of a
//! frequency to the nearest equal-tempered note (A4 = 440 Hz).

use std::fmt;

use tracing::debug;

use crate::engine::AudioBuffer;

/// Seconds of input the tuner looks at
pub const TUNER_WINDOW_SECS: f32 = 0.5;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// YIN analysis settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YinConfig {
    /// Samples per analysis frame
    pub frame_length: usize,
    /// Samples between frame starts
    pub hop: usize,
    /// Lowest detectable pitch in Hz
    pub fmin: f32,
    /// Highest detectable pitch in Hz
    pub fmax: f32,
    /// Trough depth that marks a period; frames that never reach it fall
    /// back to their deepest trough
    pub threshold: f32,
}

impl Default for YinConfig {
    fn default() -> Self {
        Self {
            frame_length: 4096,
            hop: 512,
            fmin: 50.0,
            fmax: 2000.0,
            threshold: 0.1,
        }
    }
}

/// Median pitch over all frames that carry signal, or `None` for silence
pub fn estimate_f0(samples: &[f32], sample_rate: u32) -> Option<f32> {
    estimate_f0_with(samples, sample_rate, &YinConfig::default())
}

pub fn estimate_f0_with(samples: &[f32], sample_rate: u32, config: &YinConfig) -> Option<f32> {
    if samples.is_empty() || sample_rate == 0 || config.frame_length < 4 {
        return None;
    }

    let frame_length = config.frame_length;
    let window = frame_length / 2;
    let sr = sample_rate as f64;
    let min_lag = ((sr / config.fmax as f64).floor() as usize).max(1);
    let max_lag = ((sr / config.fmin as f64).ceil() as usize).min(frame_length - window - 1);
    if min_lag >= max_lag {
        return None;
    }

    // Short inputs are analysed as one zero-padded frame
    let padded;
    let signal = if samples.len() < frame_length {
        padded = {
            let mut v = samples.to_vec();
            v.resize(frame_length, 0.0);
            v
        };
        &padded[..]
    } else {
        samples
    };

    let hop = config.hop.max(1);
    let mut estimates: Vec<f64> = (0..=(signal.len() - frame_length) / hop)
        .filter_map(|i| {
            let frame = &signal[i * hop..i * hop + frame_length];
            yin_frame(frame, window, min_lag, max_lag, config.threshold as f64)
        })
        .map(|lag| sr / lag)
        .collect();

    debug!(voiced = estimates.len(), "pitch frames analysed");
    if estimates.is_empty() {
        return None;
    }

    estimates.sort_by(f64::total_cmp);
    let mid = estimates.len() / 2;
    let median = if estimates.len() % 2 == 0 {
        (estimates[mid - 1] + estimates[mid]) / 2.0
    } else {
        estimates[mid]
    };
    Some(median as f32)
}

/// Period of one frame in (fractional) samples, or `None` for a frame with no energy
fn yin_frame(frame: &[f32], window: usize, min_lag: usize, max_lag: usize, threshold: f64) -> Option<f64> {
    // Difference function
    let mut diff = vec![0.0f64; max_lag + 2];
    for (tau, d) in diff.iter_mut().enumerate().skip(1) {
        *d = (0..window)
            .map(|j| {
                let delta = frame[j] as f64 - frame[j + tau] as f64;
                delta * delta
            })
            .sum();
    }

    // Cumulative mean normalized difference
    let mut cmnd = vec![1.0f64; diff.len()];
    let mut running = 0.0;
    for tau in 1..diff.len() {
        running += diff[tau];
        cmnd[tau] = if running > 0.0 {
            diff[tau] * tau as f64 / running
        } else {
            1.0
        };
    }
    if running <= 0.0 {
        return None;
    }

    let tau = match (min_lag..=max_lag).find(|&t| cmnd[t] < threshold) {
        Some(mut tau) => {
            while tau < max_lag && cmnd[tau + 1] < cmnd[tau] {
                tau += 1;
            }
            tau
        }
        None => earliest_deep_trough(&cmnd, min_lag, max_lag, threshold),
    };

    Some(tau as f64 + parabolic_shift(cmnd[tau - 1], cmnd[tau], cmnd[tau + 1]))
}

/// Fallback when nothing dips below the threshold: measure the threshold from
/// the curve's global minimum and take the bottom of the first trough under it
fn earliest_deep_trough(cmnd: &[f64], min_lag: usize, max_lag: usize, threshold: f64) -> usize {
    let floor = cmnd[min_lag..=max_lag]
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let limit = floor + threshold;

    let start = (min_lag..=max_lag)
        .find(|&t| cmnd[t] <= limit)
        .unwrap_or(min_lag);
    let end = (start..=max_lag)
        .take_while(|&t| cmnd[t] <= limit)
        .last()
        .unwrap_or(start);

    (start..=end)
        .min_by(|&a, &b| cmnd[a].total_cmp(&cmnd[b]))
        .unwrap_or(start)
}

/// Offset of the vertex of the parabola through three equally spaced points
fn parabolic_shift(a: f64, b: f64, c: f64) -> f64 {
    let denom = a - 2.0 * b + c;
    if denom.abs() < f64::EPSILON {
        return 0.0;
    }
    let shift = (a - c) / (2.0 * denom);
    if shift.abs() > 1.0 {
        0.0
    } else {
        shift
    }
}

/// Nearest equal-tempered note to a frequency
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Scientific pitch name, e.g. "A4"
    pub name: String,
    /// Deviation from the note, rounded to whole cents
    pub cents: i32,
    /// The measured frequency in Hz
    pub frequency: f32,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:+} cents ({:.2} Hz)",
            self.name, self.cents, self.frequency
        )
    }
}

/// Map a frequency to its nearest note; `None` for non-positive or non-finite input
pub fn note_for(frequency: f32) -> Option<Note> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return None;
    }
    let f = frequency as f64;
    let midi = (69.0 + 12.0 * (f / 440.0).log2()).round() as i32;
    let reference = 440.0 * 2f64.powf((midi - 69) as f64 / 12.0);
    let cents = (1200.0 * (f / reference).log2()).round() as i32;
    let name = format!(
        "{}{}",
        NOTE_NAMES[midi.rem_euclid(12) as usize],
        midi.div_euclid(12) - 1
    );
    Some(Note {
        name,
        cents,
        frequency,
    })
}

/// Tune from the start of a buffer
pub fn tune(buffer: &AudioBuffer) -> Option<Note> {
    estimate_f0(buffer.head(TUNER_WINDOW_SECS), buffer.sample_rate()).and_then(note_for)
}
