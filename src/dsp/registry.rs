//! Effect registry
//!
//! Read-only lookup from a pedal's name to its kind. A registry is built once
//! and can be shared between any number of chain evaluations.

use std::collections::BTreeMap;

use super::effect::{Effect, EffectKind, EffectSpec};
use crate::error::{Result, StompboxError};

/// Registry of available pedals
#[derive(Debug, Clone)]
pub struct EffectRegistry {
    kinds: BTreeMap<&'static str, EffectKind>,
}

impl EffectRegistry {
    /// Registry holding all eight pedals
    pub fn new() -> Self {
        Self {
            kinds: EffectKind::ALL
                .into_iter()
                .map(|kind| (kind.name(), kind))
                .collect(),
        }
    }

    /// Exact, case-sensitive lookup
    pub fn resolve(&self, name: &str) -> Option<EffectKind> {
        self.kinds.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Registered names in alphabetical order
    pub fn names(&self) -> Vec<&'static str> {
        self.kinds.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Build a typed pedal from its loose form
    ///
    /// Unlike the chain, which skips bad stages, this reports them as errors.
    pub fn build(&self, spec: &EffectSpec) -> Result<Effect> {
        let kind = self
            .resolve(&spec.name)
            .ok_or_else(|| StompboxError::UnknownEffect {
                name: spec.name.clone(),
            })?;
        kind.build(&spec.params)
            .map_err(|source| StompboxError::ParameterMismatch {
                effect: spec.name.clone(),
                source,
            })
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line description of each pedal, for listings
pub fn describe(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::Compressor => "Static compressor: reduces level above the threshold",
        EffectKind::Distortion => "Hard clipper: drives the signal into a fixed ceiling",
        EffectKind::Overdrive => "Soft clipper: tanh saturation with a brightness blend",
        EffectKind::Equalizer => "Three-band equalizer split at 400 Hz and 3 kHz",
        EffectKind::Tremolo => "Amplitude modulation by a sine LFO",
        EffectKind::Chorus => "Modulated short delay around 15 ms",
        EffectKind::Delay => "Feedback echo",
        EffectKind::Reverb => "Convolution with a recorded impulse response",
    }
}
