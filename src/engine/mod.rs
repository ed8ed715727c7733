//! Audio engine plumbing: the sample buffer and WAV file I/O.

pub mod buffer;
pub mod io;

pub use buffer::{AudioBuffer, DEMO_SAMPLE_RATE};
pub use io::{load_wav, save_wav};
