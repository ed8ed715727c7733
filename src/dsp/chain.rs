//! Effect chain and chain processor
//!
//! Stages run strictly in the order given, each consuming the buffer the
//! previous one produced. A stage whose name the registry does not know, or
//! whose parameters do not match the pedal, is skipped with a warning and the
//! signal passes through it untouched. Impulse-response failures in the
//! reverb are not recovered: they end the whole run.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::effect::{EffectSpec, ProcessContext};
use super::impulse::{FileImpulses, ImpulseSource};
use super::registry::EffectRegistry;
use crate::engine::AudioBuffer;
use crate::error::{ParamError, Result};

/// Ordered list of stages, in the loose form the UI provides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectChain {
    stages: Vec<EffectSpec>,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(stages: Vec<EffectSpec>) -> Self {
        Self { stages }
    }

    /// Append a stage at the end of the chain
    pub fn push(&mut self, stage: impl Into<EffectSpec>) {
        self.stages.push(stage.into());
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, stage: impl Into<EffectSpec>) -> Self {
        self.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectSpec> {
        self.stages.iter()
    }

    pub fn specs(&self) -> &[EffectSpec] {
        &self.stages
    }

    /// Stage names in processing order
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Read a chain file: a JSON array of `{ "name", "params" }` objects
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Run the chain with the default registry, reading impulse responses from disk
    pub fn process(&self, input: &AudioBuffer) -> Result<ChainOutput> {
        ChainProcessor::new().run(input, &self.stages)
    }
}

impl FromIterator<EffectSpec> for EffectChain {
    fn from_iter<I: IntoIterator<Item = EffectSpec>>(iter: I) -> Self {
        Self::from_specs(iter.into_iter().collect())
    }
}

impl fmt::Display for EffectChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stages.is_empty() {
            return f.write_str("(dry)");
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" → ")?;
            }
            write!(f, "[{}]", stage.name)?;
        }
        Ok(())
    }
}

/// Why a stage was passed over
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    UnknownEffect,
    ParameterMismatch(ParamError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownEffect => f.write_str("no such effect"),
            SkipReason::ParameterMismatch(e) => write!(f, "{e}"),
        }
    }
}

/// A stage that did not run
#[derive(Debug, Clone, PartialEq)]
pub struct ChainWarning {
    /// Index of the stage in the chain
    pub position: usize,
    pub effect: String,
    pub reason: SkipReason,
}

impl fmt::Display for ChainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stage {} ({}) skipped: {}",
            self.position, self.effect, self.reason
        )
    }
}

/// Result of running a chain
#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub buffer: AudioBuffer,
    pub warnings: Vec<ChainWarning>,
    /// Names of the stages that ran, in order
    pub applied: Vec<&'static str>,
}

/// Folds a buffer through a list of stages
pub struct ChainProcessor {
    registry: EffectRegistry,
    impulses: Arc<dyn ImpulseSource>,
}

impl ChainProcessor {
    pub fn new() -> Self {
        Self::with_impulses(Arc::new(FileImpulses))
    }

    /// Processor that fetches impulse responses from `impulses`
    pub fn with_impulses(impulses: Arc<dyn ImpulseSource>) -> Self {
        Self {
            registry: EffectRegistry::new(),
            impulses,
        }
    }

    /// Run `stages` over a copy of `input`
    ///
    /// The input buffer is never modified. The output has the input's length
    /// and sample rate.
    pub fn run(&self, input: &AudioBuffer, stages: &[EffectSpec]) -> Result<ChainOutput> {
        let ctx = ProcessContext::new(input.sample_rate(), self.impulses.as_ref());
        let mut current = input.samples().to_vec();
        let mut warnings = Vec::new();
        let mut applied = Vec::with_capacity(stages.len());

        for (position, spec) in stages.iter().enumerate() {
            let Some(kind) = self.registry.resolve(&spec.name) else {
                warn!(position, effect = %spec.name, "unknown effect, skipping");
                warnings.push(ChainWarning {
                    position,
                    effect: spec.name.clone(),
                    reason: SkipReason::UnknownEffect,
                });
                continue;
            };

            let effect = match kind.build(&spec.params) {
                Ok(effect) => effect,
                Err(e) => {
                    warn!(position, effect = %spec.name, error = %e, "parameter mismatch, skipping");
                    warnings.push(ChainWarning {
                        position,
                        effect: spec.name.clone(),
                        reason: SkipReason::ParameterMismatch(e),
                    });
                    continue;
                }
            };

            let output = effect.apply(&current, &ctx)?;
            debug_assert_eq!(output.len(), current.len());
            debug!(position, effect = kind.name(), samples = output.len(), "stage applied");
            current = output;
            applied.push(kind.name());
        }

        Ok(ChainOutput {
            buffer: AudioBuffer::new(current, input.sample_rate()),
            warnings,
            applied,
        })
    }
}

impl Default for ChainProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `stages` over `input` with the default processor
pub fn process_chain(input: &AudioBuffer, stages: &[EffectSpec]) -> Result<AudioBuffer> {
    Ok(ChainProcessor::new().run(input, stages)?.buffer)
}
