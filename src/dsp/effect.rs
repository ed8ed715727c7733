//! Pedal trait and the closed set of pedals
//!
//! Every pedal is a pure transform from an input buffer to a new output
//! buffer of the same length. [`Effect`] is the sum of the eight pedals, each
//! carrying its own parameter record; [`EffectKind`] is the name-only view
//! used for lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::impulse::{FileImpulses, ImpulseSource};
use super::params::ParamMap;
use super::{Chorus, Compressor, Delay, Distortion, Equalizer, Overdrive, Reverb, Tremolo};
use crate::error::{ParamError, Result};

/// Everything a pedal needs besides its input samples
#[derive(Clone, Copy)]
pub struct ProcessContext<'a> {
    /// Working sample rate in Hz
    pub sample_rate: u32,
    /// Where the reverb finds its impulse responses
    pub impulses: &'a dyn ImpulseSource,
}

impl<'a> ProcessContext<'a> {
    pub fn new(sample_rate: u32, impulses: &'a dyn ImpulseSource) -> Self {
        Self {
            sample_rate,
            impulses,
        }
    }
}

impl ProcessContext<'static> {
    /// Context that reads impulse responses straight from disk
    pub fn offline(sample_rate: u32) -> Self {
        Self::new(sample_rate, &FileImpulses)
    }
}

impl fmt::Debug for ProcessContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessContext")
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

/// Base trait for all pedals
pub trait Pedal: Sized {
    /// Registry name (case-sensitive)
    const NAME: &'static str;

    /// Accepted knob names
    const PARAMS: &'static [&'static str];

    /// Build from a loosely typed map, defaulting absent knobs
    fn from_params(params: &ParamMap) -> std::result::Result<Self, ParamError>;

    /// Current knob values as a map
    fn to_params(&self) -> ParamMap;

    /// Process `input`, returning a new buffer of the same length
    fn apply(&self, input: &[f32], ctx: &ProcessContext<'_>) -> Result<Vec<f32>>;
}

/// Pedal names, in pedalboard order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectKind {
    Compressor,
    Distortion,
    Overdrive,
    Equalizer,
    Tremolo,
    Chorus,
    Delay,
    Reverb,
}

impl EffectKind {
    /// All pedals in pedalboard order
    pub const ALL: [EffectKind; 8] = [
        EffectKind::Compressor,
        EffectKind::Distortion,
        EffectKind::Overdrive,
        EffectKind::Equalizer,
        EffectKind::Tremolo,
        EffectKind::Chorus,
        EffectKind::Delay,
        EffectKind::Reverb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Compressor => Compressor::NAME,
            EffectKind::Distortion => Distortion::NAME,
            EffectKind::Overdrive => Overdrive::NAME,
            EffectKind::Equalizer => Equalizer::NAME,
            EffectKind::Tremolo => Tremolo::NAME,
            EffectKind::Chorus => Chorus::NAME,
            EffectKind::Delay => Delay::NAME,
            EffectKind::Reverb => Reverb::NAME,
        }
    }

    /// Exact, case-sensitive name lookup
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Knob names in declaration order
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            EffectKind::Compressor => Compressor::PARAMS,
            EffectKind::Distortion => Distortion::PARAMS,
            EffectKind::Overdrive => Overdrive::PARAMS,
            EffectKind::Equalizer => Equalizer::PARAMS,
            EffectKind::Tremolo => Tremolo::PARAMS,
            EffectKind::Chorus => Chorus::PARAMS,
            EffectKind::Delay => Delay::PARAMS,
            EffectKind::Reverb => Reverb::PARAMS,
        }
    }

    /// Build the typed pedal from a parameter map
    pub fn build(self, params: &ParamMap) -> std::result::Result<Effect, ParamError> {
        Ok(match self {
            EffectKind::Compressor => Effect::Compressor(Compressor::from_params(params)?),
            EffectKind::Distortion => Effect::Distortion(Distortion::from_params(params)?),
            EffectKind::Overdrive => Effect::Overdrive(Overdrive::from_params(params)?),
            EffectKind::Equalizer => Effect::Equalizer(Equalizer::from_params(params)?),
            EffectKind::Tremolo => Effect::Tremolo(Tremolo::from_params(params)?),
            EffectKind::Chorus => Effect::Chorus(Chorus::from_params(params)?),
            EffectKind::Delay => Effect::Delay(Delay::from_params(params)?),
            EffectKind::Reverb => Effect::Reverb(Reverb::from_params(params)?),
        })
    }

    /// The pedal with factory settings
    pub fn default_effect(self) -> Effect {
        match self {
            EffectKind::Compressor => Effect::Compressor(Compressor::default()),
            EffectKind::Distortion => Effect::Distortion(Distortion::default()),
            EffectKind::Overdrive => Effect::Overdrive(Overdrive::default()),
            EffectKind::Equalizer => Effect::Equalizer(Equalizer::default()),
            EffectKind::Tremolo => Effect::Tremolo(Tremolo::default()),
            EffectKind::Chorus => Effect::Chorus(Chorus::default()),
            EffectKind::Delay => Effect::Delay(Delay::default()),
            EffectKind::Reverb => Effect::Reverb(Reverb::default()),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One configured pedal
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Compressor(Compressor),
    Distortion(Distortion),
    Overdrive(Overdrive),
    Equalizer(Equalizer),
    Tremolo(Tremolo),
    Chorus(Chorus),
    Delay(Delay),
    Reverb(Reverb),
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Compressor(_) => EffectKind::Compressor,
            Effect::Distortion(_) => EffectKind::Distortion,
            Effect::Overdrive(_) => EffectKind::Overdrive,
            Effect::Equalizer(_) => EffectKind::Equalizer,
            Effect::Tremolo(_) => EffectKind::Tremolo,
            Effect::Chorus(_) => EffectKind::Chorus,
            Effect::Delay(_) => EffectKind::Delay,
            Effect::Reverb(_) => EffectKind::Reverb,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn to_params(&self) -> ParamMap {
        match self {
            Effect::Compressor(p) => p.to_params(),
            Effect::Distortion(p) => p.to_params(),
            Effect::Overdrive(p) => p.to_params(),
            Effect::Equalizer(p) => p.to_params(),
            Effect::Tremolo(p) => p.to_params(),
            Effect::Chorus(p) => p.to_params(),
            Effect::Delay(p) => p.to_params(),
            Effect::Reverb(p) => p.to_params(),
        }
    }

    /// Process `input` through this pedal
    pub fn apply(&self, input: &[f32], ctx: &ProcessContext<'_>) -> Result<Vec<f32>> {
        match self {
            Effect::Compressor(p) => p.apply(input, ctx),
            Effect::Distortion(p) => p.apply(input, ctx),
            Effect::Overdrive(p) => p.apply(input, ctx),
            Effect::Equalizer(p) => p.apply(input, ctx),
            Effect::Tremolo(p) => p.apply(input, ctx),
            Effect::Chorus(p) => p.apply(input, ctx),
            Effect::Delay(p) => p.apply(input, ctx),
            Effect::Reverb(p) => p.apply(input, ctx),
        }
    }

    /// The loosely typed form of this pedal
    pub fn to_spec(&self) -> EffectSpec {
        EffectSpec::new(self.name(), self.to_params())
    }
}

/// A pedal as the UI hands it over: a name plus knob values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub name: String,
    #[serde(default)]
    pub params: ParamMap,
}

impl EffectSpec {
    pub fn new(name: impl Into<String>, params: ParamMap) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

impl From<Effect> for EffectSpec {
    fn from(effect: Effect) -> Self {
        effect.to_spec()
    }
}

impl From<&Effect> for EffectSpec {
    fn from(effect: &Effect) -> Self {
        effect.to_spec()
    }
}

macro_rules! pedal_conversions {
    ($($pedal:ident),* $(,)?) => {
        $(
            impl From<$pedal> for Effect {
                fn from(pedal: $pedal) -> Self {
                    Effect::$pedal(pedal)
                }
            }

            impl From<$pedal> for EffectSpec {
                fn from(pedal: $pedal) -> Self {
                    EffectSpec::new($pedal::NAME, pedal.to_params())
                }
            }
        )*
    };
}

pedal_conversions!(Compressor, Distortion, Overdrive, Equalizer, Tremolo, Chorus, Delay, Reverb);
