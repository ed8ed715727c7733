//! Stompbox - offline guitar pedal chain
//!
//! Stompbox runs a mono recording through a chain of classic guitar pedals:
//! compressor, distortion, overdrive, three-band EQ, tremolo, chorus, delay
//! and convolution reverb.
//!
//! # Architecture
//!
//! - `dsp`: the pedals, the registry that looks them up by name and the
//!   chain processor that folds a buffer through them in order
//! - `engine`: the mono audio buffer and WAV file I/O
//! - `pedalboard`: the fixed eight-slot board loaded from JSON
//! - `tuner`: pitch estimation for the input signal

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod pedalboard;
pub mod tuner;

pub use dsp::{ChainOutput, EffectChain, EffectKind, EffectSpec};
pub use engine::AudioBuffer;
pub use error::{Result, StompboxError};
pub use pedalboard::Pedalboard;
