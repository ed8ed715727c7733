//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::dsp::{
    describe, ChainProcessor, EffectChain, EffectKind, IrCache, ParamValue, DEFAULT_IR_PATH,
};
use crate::engine::{load_wav, save_wav, AudioBuffer};
use crate::pedalboard::Pedalboard;
use crate::tuner;

/// Load the input file, or the demo tone when no file is given
fn load_input(input: Option<&Path>) -> Result<AudioBuffer> {
    match input {
        Some(path) => {
            info!("Loading input: {}", path.display());
            load_wav(path).with_context(|| format!("reading {}", path.display()))
        }
        None => Ok(AudioBuffer::demo_tone()),
    }
}

/// Process a recording through a pedalboard or chain file.
pub fn process(
    input: Option<&Path>,
    output: &Path,
    board: Option<&Path>,
    chain: Option<&Path>,
) -> Result<()> {
    let buffer = load_input(input)?;

    let chain = match (board, chain) {
        (Some(path), _) => Pedalboard::load_json(path)
            .with_context(|| format!("loading pedalboard {}", path.display()))?
            .to_chain(),
        (None, Some(path)) => EffectChain::load_json(path)
            .with_context(|| format!("loading chain {}", path.display()))?,
        (None, None) => EffectChain::new(),
    };

    println!("Signal path: {chain}");

    let processor = ChainProcessor::with_impulses(Arc::new(IrCache::new()));
    let result = processor
        .run(&buffer, chain.specs())
        .context("processing failed")?;

    for warning in &result.warnings {
        warn!("{warning}");
        println!("Skipped: {warning}");
    }

    save_wav(&result.buffer, output).with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Wrote {} ({:.2} s, {} Hz, peak {:.3})",
        output.display(),
        result.buffer.duration(),
        result.buffer.sample_rate(),
        result.buffer.peak()
    );
    if result.applied.len() != chain.len() {
        println!("Applied {} of {} stages", result.applied.len(), chain.len());
    }

    Ok(())
}

/// List the available effects with their default parameters.
pub fn list_effects() -> Result<()> {
    println!("Available effects:");
    println!("{:-<60}", "");

    for kind in EffectKind::ALL {
        println!("{:<12} {}", kind.name(), describe(kind));
        for line in knob_defaults(kind) {
            println!("    {line}");
        }
    }

    println!();
    println!("Reverb loads {DEFAULT_IR_PATH} (not bundled) unless ir_path is set.");

    Ok(())
}

/// One "knob default value" line per parameter, in declaration order
fn knob_defaults(kind: EffectKind) -> Vec<String> {
    let defaults = kind.default_effect().to_params();
    kind.param_names()
        .iter()
        .filter_map(|name| {
            // Knobs are stored as f32; print them at that precision
            let value = match defaults.get(*name)? {
                ParamValue::Number(n) => format!("{}", *n as f32),
                ParamValue::Text(s) => format!("\"{s}\""),
            };
            Some(format!("{name:<14} default {value}"))
        })
        .collect()
}

/// Estimate the pitch of the first half second of a recording.
pub fn tune(input: Option<&Path>) -> Result<()> {
    let buffer = load_input(input)?;

    match tuner::tune(&buffer) {
        Some(note) => {
            println!("Note:      {}", note.name);
            println!("Frequency: {:.2} Hz", note.frequency);
            println!("Cents:     {:+}", note.cents);
        }
        None => println!("No pitch detected"),
    }

    Ok(())
}

/// Write the demo tone.
pub fn demo(output: &Path) -> Result<()> {
    let tone = AudioBuffer::demo_tone();
    save_wav(&tone, output).with_context(|| format!("writing {}", output.display()))?;
    println!("Demo tone written: {}", output.display());
    Ok(())
}
