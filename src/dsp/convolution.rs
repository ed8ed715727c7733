//! FFT linear convolution
//!
//! Taps of `h` past `len(x)` cannot reach the kept output and are dropped
//! first. Both signals are then zero-padded to a power of two of at least
//! `len(x) + len(h) - 1`, so the circular product equals the full linear
//! convolution. Only the first `len(x)` samples are kept.

use rustfft::{num_complex::Complex, FftPlanner};

/// Linear convolution of `x` with `h`, truncated to `x.len()` samples
pub fn convolve_truncated(x: &[f32], h: &[f32]) -> Vec<f32> {
    if x.is_empty() {
        return Vec::new();
    }
    if h.is_empty() {
        return vec![0.0; x.len()];
    }
    let h = &h[..h.len().min(x.len())];

    let full_len = x.len() + h.len() - 1;
    let fft_size = full_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_size);
    let inverse = planner.plan_fft_inverse(fft_size);

    let mut spectrum_x = padded(x, fft_size);
    let mut spectrum_h = padded(h, fft_size);
    forward.process(&mut spectrum_x);
    forward.process(&mut spectrum_h);

    for (a, b) in spectrum_x.iter_mut().zip(&spectrum_h) {
        *a = *a * *b;
    }
    inverse.process(&mut spectrum_x);

    // rustfft leaves the inverse unnormalized
    let scale = 1.0 / fft_size as f64;
    spectrum_x
        .iter()
        .take(x.len())
        .map(|c| (c.re * scale) as f32)
        .collect()
}

fn padded(signal: &[f32], size: usize) -> Vec<Complex<f64>> {
    let mut buf: Vec<Complex<f64>> = signal
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();
    buf.resize(size, Complex::new(0.0, 0.0));
    buf
}
