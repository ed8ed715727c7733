//! DSP effects library
//!
//! The eight pedals, the shared safety helpers they finish with, and the
//! registry and chain that string them together. Every pedal is a pure
//! function of its input buffer and returns a new buffer of the same length.

mod chain;
mod chorus;
mod compressor;
mod convolution;
mod delay;
mod distortion;
mod effect;
mod eq;
mod impulse;
mod overdrive;
mod params;
mod registry;
mod reverb;
pub mod safety;
mod tremolo;

pub use chain::{
    process_chain, ChainOutput, ChainProcessor, ChainWarning, EffectChain, SkipReason,
};
pub use chorus::Chorus;
pub use compressor::Compressor;
pub use convolution::convolve_truncated;
pub use delay::Delay;
pub use distortion::Distortion;
pub use effect::{Effect, EffectKind, EffectSpec, Pedal, ProcessContext};
pub use eq::{split_bands, Bands, Equalizer, HIGH_CUT_HZ, LOW_CUT_HZ};
pub use impulse::{resample_nearest, FileImpulses, ImpulseSource, IrCache};
pub use overdrive::Overdrive;
pub use params::{param_map, ParamMap, ParamReader, ParamValue};
pub use registry::{describe, EffectRegistry};
pub use reverb::{Reverb, DEFAULT_IR_PATH};
pub use tremolo::Tremolo;
