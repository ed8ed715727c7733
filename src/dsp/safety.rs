//! Shared output stage for every pedal
//!
//! Each pedal blends its wet signal with the dry input and then runs the
//! result through [`normalize_peak`], which only acts when the blend would
//! clip.

/// Added to the peak before dividing so a degenerate peak never divides by zero
pub const NORMALIZE_EPSILON: f64 = 1e-9;

/// Scale `out` into the unit range if its peak exceeds 1.0
///
/// When `max(|out|) > 1.0` every sample is multiplied by
/// `1 / (max(|out|) + ε)`; otherwise the buffer is returned untouched.
/// Non-finite samples are not sanitised.
pub fn normalize_peak(mut out: Vec<f32>) -> Vec<f32> {
    let peak = out.iter().map(|s| s.abs()).fold(0.0f32, f32::max) as f64;
    if peak > 1.0 {
        let scale = 1.0 / (peak + NORMALIZE_EPSILON);
        for sample in &mut out {
            *sample = (*sample as f64 * scale) as f32;
        }
    }
    out
}

/// Blend dry and wet signals: `(1 - mix) * dry + mix * wet`
///
/// Both slices must have the same length.
pub fn mix_dry_wet(dry: &[f32], wet: &[f32], mix: f32) -> Vec<f32> {
    debug_assert_eq!(dry.len(), wet.len());
    let dry_gain = 1.0 - mix;
    dry.iter()
        .zip(wet)
        .map(|(&d, &w)| dry_gain * d + mix * w)
        .collect()
}

/// Mix then normalize, the final step every pedal shares
pub fn finish(dry: &[f32], wet: &[f32], mix: f32) -> Vec<f32> {
    normalize_peak(mix_dry_wet(dry, wet, mix))
}
