//! Pedalboard configuration
//!
//! A fixed rack of the eight pedals in signal order. Each slot carries an
//! on/off switch next to the pedal's knobs, so a board file reads like:
//!
//! ```json
//! {
//!   "compressor": { "enabled": true, "threshold": 0.3 },
//!   "delay": { "enabled": true, "delay_ms": 250, "feedback": 0.5 }
//! }
//! ```
//!
//! Slots and knobs left out take factory settings; slots are off by default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsp::{
    Chorus, Compressor, Delay, Distortion, EffectChain, EffectKind, EffectSpec, Equalizer,
    Overdrive, Reverb, Tremolo,
};
use crate::error::Result;

/// A pedal plus its footswitch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PedalSlot<T> {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub settings: T,
}

impl<T> PedalSlot<T> {
    pub fn on(settings: T) -> Self {
        Self {
            enabled: true,
            settings,
        }
    }
}

/// The eight pedals in their fixed order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pedalboard {
    pub compressor: PedalSlot<Compressor>,
    pub distortion: PedalSlot<Distortion>,
    pub overdrive: PedalSlot<Overdrive>,
    pub equalizer: PedalSlot<Equalizer>,
    pub tremolo: PedalSlot<Tremolo>,
    pub chorus: PedalSlot<Chorus>,
    pub delay: PedalSlot<Delay>,
    pub reverb: PedalSlot<Reverb>,
}

impl Pedalboard {
    /// Load a board from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Which slots are switched on, in board order
    pub fn enabled_kinds(&self) -> Vec<EffectKind> {
        self.specs().into_iter().map(|(kind, _)| kind).collect()
    }

    /// The enabled pedals as a chain, in board order
    pub fn to_chain(&self) -> EffectChain {
        self.specs().into_iter().map(|(_, spec)| spec).collect()
    }

    fn specs(&self) -> Vec<(EffectKind, EffectSpec)> {
        fn slot<T: Clone + Into<EffectSpec>>(
            kind: EffectKind,
            pedal: &PedalSlot<T>,
        ) -> Option<(EffectKind, EffectSpec)> {
            pedal.enabled.then(|| (kind, pedal.settings.clone().into()))
        }

        [
            slot(EffectKind::Compressor, &self.compressor),
            slot(EffectKind::Distortion, &self.distortion),
            slot(EffectKind::Overdrive, &self.overdrive),
            slot(EffectKind::Equalizer, &self.equalizer),
            slot(EffectKind::Tremolo, &self.tremolo),
            slot(EffectKind::Chorus, &self.chorus),
            slot(EffectKind::Delay, &self.delay),
            slot(EffectKind::Reverb, &self.reverb),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
