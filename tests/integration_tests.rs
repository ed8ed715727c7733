//! Integration Tests
//!
//! End-to-end tests for the Stompbox pedal chain.

use std::path::Path;
use std::sync::Arc;

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};
use test_case::test_case;

use stompbox::dsp::{
    convolve_truncated, param_map, process_chain, resample_nearest, safety, ChainProcessor,
    Chorus, Compressor, Delay, Distortion, EffectKind, EffectSpec, Equalizer, FileImpulses,
    ImpulseSource, IrCache, Overdrive, ParamValue, Pedal, Reverb, SkipReason, Tremolo,
    DEFAULT_IR_PATH,
};
use stompbox::engine::{save_wav, AudioBuffer};
use stompbox::{EffectChain, Pedalboard};

const SR: u32 = 44100;

/// Short decaying impulse response written to a temp dir
fn write_ir(dir: &TempDir, name: &str, len: usize, sample_rate: u32) -> String {
    let samples: Vec<f32> = (0..len)
        .map(|i| 0.8 * (-(i as f32) / (len as f32 / 4.0)).exp())
        .collect();
    let path = dir.path().join(name);
    save_wav(&AudioBuffer::new(samples, sample_rate), &path).unwrap();
    path.to_string_lossy().into_owned()
}

/// A pedal with non-trivial settings and the given mix
fn stage(kind: EffectKind, mix: f32, ir_path: &str) -> EffectSpec {
    let mut spec = kind.default_effect().to_spec();
    spec.params.insert("mix".to_string(), mix.into());
    if kind == EffectKind::Reverb {
        spec.params
            .insert("ir_path".to_string(), ParamValue::from(ir_path));
    }
    spec
}

fn guitar_like(duration_secs: f32) -> AudioBuffer {
    let n = (duration_secs * SR as f32) as usize;
    let samples = (0..n)
        .map(|i| {
            let t = i as f32 / SR as f32;
            let env = (-3.0 * t).exp();
            env * (0.6 * (2.0 * std::f32::consts::PI * 110.0 * t).sin()
                + 0.3 * (2.0 * std::f32::consts::PI * 220.0 * t).sin())
        })
        .collect();
    AudioBuffer::new(samples, SR)
}

// === Chain Properties ===

#[test]
fn test_empty_chain_is_identity() {
    let input = guitar_like(0.25);
    let output = process_chain(&input, &[]).unwrap();
    assert!(output.is_identical_to(&input));
}

#[test_case(EffectKind::Compressor ; "compressor")]
#[test_case(EffectKind::Distortion ; "distortion")]
#[test_case(EffectKind::Overdrive ; "overdrive")]
#[test_case(EffectKind::Equalizer ; "equalizer")]
#[test_case(EffectKind::Tremolo ; "tremolo")]
#[test_case(EffectKind::Chorus ; "chorus")]
#[test_case(EffectKind::Delay ; "delay")]
#[test_case(EffectKind::Reverb ; "reverb")]
fn test_stage_preserves_length_and_bounds(kind: EffectKind) {
    let dir = tempdir().unwrap();
    let ir = write_ir(&dir, "ir.wav", 2048, SR);
    // Hot input, well past unity
    let input = AudioBuffer::new(
        guitar_like(0.25).samples().iter().map(|s| s * 3.0).collect(),
        SR,
    );

    let output = process_chain(&input, &[stage(kind, 1.0, &ir)]).unwrap();

    assert_eq!(output.len(), input.len());
    assert_eq!(output.sample_rate(), SR);
    assert!(output.peak() <= 1.0 + 1e-6, "{kind} peak {}", output.peak());
}

#[test_case(EffectKind::Compressor ; "compressor")]
#[test_case(EffectKind::Distortion ; "distortion")]
#[test_case(EffectKind::Overdrive ; "overdrive")]
#[test_case(EffectKind::Equalizer ; "equalizer")]
#[test_case(EffectKind::Tremolo ; "tremolo")]
#[test_case(EffectKind::Chorus ; "chorus")]
#[test_case(EffectKind::Delay ; "delay")]
#[test_case(EffectKind::Reverb ; "reverb")]
fn test_zero_mix_is_bypass(kind: EffectKind) {
    let dir = tempdir().unwrap();
    let ir = write_ir(&dir, "ir.wav", 512, SR);
    let input = guitar_like(0.1);

    let output = process_chain(&input, &[stage(kind, 0.0, &ir)]).unwrap();

    assert!(output.is_identical_to(&input), "{kind} altered the dry signal");
}

/// The pedal's own wet path, before mixing and normalization
fn raw_wet(kind: EffectKind, spec: &EffectSpec, input: &[f32]) -> Vec<f32> {
    let params = &spec.params;
    match kind {
        EffectKind::Compressor => Compressor::from_params(params).unwrap().wet(input),
        EffectKind::Distortion => Distortion::from_params(params).unwrap().wet(input),
        EffectKind::Overdrive => Overdrive::from_params(params).unwrap().wet(input),
        EffectKind::Equalizer => Equalizer::from_params(params).unwrap().wet(input, SR),
        EffectKind::Tremolo => Tremolo::from_params(params).unwrap().wet(input, SR),
        EffectKind::Chorus => Chorus::from_params(params).unwrap().wet(input, SR),
        EffectKind::Delay => Delay::from_params(params).unwrap().wet(input, SR),
        EffectKind::Reverb => {
            let reverb = Reverb::from_params(params).unwrap();
            let ir = FileImpulses.load(Path::new(&reverb.ir_path), SR).unwrap();
            convolve_truncated(input, &ir)
        }
    }
}

#[test_case(EffectKind::Compressor ; "compressor")]
#[test_case(EffectKind::Distortion ; "distortion")]
#[test_case(EffectKind::Overdrive ; "overdrive")]
#[test_case(EffectKind::Equalizer ; "equalizer")]
#[test_case(EffectKind::Tremolo ; "tremolo")]
#[test_case(EffectKind::Chorus ; "chorus")]
#[test_case(EffectKind::Delay ; "delay")]
#[test_case(EffectKind::Reverb ; "reverb")]
fn test_full_mix_is_raw_wet(kind: EffectKind) {
    let dir = tempdir().unwrap();
    let ir = write_ir(&dir, "ir.wav", 512, SR);
    let input = guitar_like(0.1);
    let spec = stage(kind, 1.0, &ir);

    let output = process_chain(&input, std::slice::from_ref(&spec)).unwrap();

    let expected = safety::normalize_peak(raw_wet(kind, &spec, input.samples()));
    assert_eq!(output.samples(), &expected[..], "{kind} mixed in dry signal");
}

#[test]
fn test_compressor_below_threshold_is_identity() {
    let input = AudioBuffer::sine_wave(330.0, 0.3, 0.1, SR);
    let compressor = Compressor::default();
    assert!(input.peak() < compressor.threshold);
    assert_eq!(compressor.wet(input.samples()), input.samples().to_vec());
}

#[test]
fn test_chain_order_matters() {
    let input = AudioBuffer::sine_wave(220.0, 0.5, 0.2, SR);
    let distortion = Distortion {
        drive: 8.0,
        threshold: 0.4,
        mix: 1.0,
    };
    let tremolo = Tremolo {
        rate: 6.0,
        depth: 0.9,
        mix: 1.0,
    };

    let forward = [EffectSpec::from(distortion), EffectSpec::from(tremolo)];
    let reversed = [forward[1].clone(), forward[0].clone()];

    let a = process_chain(&input, &forward).unwrap();
    let b = process_chain(&input, &reversed).unwrap();

    assert_eq!(a.len(), b.len());
    assert!(!a.is_approx_equal(&b, 1e-3));
}

#[test]
fn test_unknown_stage_matches_chain_without_it() {
    let input = guitar_like(0.2);
    let with_flanger = EffectChain::new()
        .with(Compressor::default())
        .with(EffectSpec::new("Flanger", param_map([("rate", 0.5)])))
        .with(Delay::default());
    let without = EffectChain::new()
        .with(Compressor::default())
        .with(Delay::default());

    let a = with_flanger.process(&input).unwrap();
    let b = without.process(&input).unwrap();

    assert!(a.buffer.is_identical_to(&b.buffer));
    assert_eq!(a.applied, vec!["Compressor", "Delay"]);
    assert_eq!(a.warnings.len(), 1);
    assert_eq!(a.warnings[0].effect, "Flanger");
    assert_eq!(a.warnings[0].reason, SkipReason::UnknownEffect);
}

#[test]
fn test_names_are_case_sensitive() {
    let input = guitar_like(0.1);
    let out = EffectChain::new()
        .with(EffectSpec::new("distortion", Default::default()))
        .process(&input)
        .unwrap();
    assert!(out.buffer.is_identical_to(&input));
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_mismatched_parameters_skip_only_that_stage() {
    let input = guitar_like(0.1);
    let out = EffectChain::new()
        .with(EffectSpec::new(
            "Overdrive",
            param_map([("gain", ParamValue::from("loud"))]),
        ))
        .with(Tremolo::default())
        .process(&input)
        .unwrap();
    let reference = EffectChain::new()
        .with(Tremolo::default())
        .process(&input)
        .unwrap();

    assert!(out.buffer.is_identical_to(&reference.buffer));
    assert!(matches!(
        out.warnings[0].reason,
        SkipReason::ParameterMismatch(_)
    ));
}

// === Concrete Scenario ===

#[test]
fn test_compressor_then_delay_on_demo_tone() {
    let input = AudioBuffer::sine_wave(440.0, 0.4, 2.0, SR);
    let chain = EffectChain::new()
        .with(Compressor {
            threshold: 0.4,
            ratio: 4.0,
            makeup: 1.0,
            mix: 1.0,
        })
        .with(Delay {
            delay_ms: 300.0,
            feedback: 0.4,
            mix: 0.3,
        });

    let out = chain.process(&input).unwrap();
    let samples = out.buffer.samples();

    assert_eq!(samples.len(), 88200);
    assert!(out.buffer.peak() <= 1.0);
    assert_eq!(chain.to_string(), "[Compressor] → [Delay]");

    // No echo before 300 ms
    let compressed = Compressor::default().wet(input.samples());
    for n in 0..13230 {
        assert_relative_eq!(samples[n], compressed[n], epsilon = 1e-6);
    }
    // The first echo arrives right after
    let tail_diff = (13230..14000)
        .map(|n| (samples[n] - compressed[n]).abs())
        .fold(0.0f32, f32::max);
    assert!(tail_diff > 1e-3);
}

// === Reverb ===

#[test_case(22050, 1001, 2002 ; "upsample doubles")]
#[test_case(48000, 1000, 919 ; "downsample rounds")]
#[test_case(44100, 777, 777 ; "same rate")]
fn test_ir_resampled_to_working_rate(native: u32, len: usize, expected: usize) {
    let dir = tempdir().unwrap();
    let path = write_ir(&dir, "ir.wav", len, native);

    let ir = FileImpulses.load(Path::new(&path), SR).unwrap();
    assert_eq!(ir.len(), expected);

    let raw: Vec<f32> = vec![0.0; len];
    assert_eq!(resample_nearest(&raw, native, SR).len(), expected);
}

#[test]
fn test_reverb_missing_ir_aborts_chain() {
    let input = guitar_like(0.1);
    let chain = EffectChain::new()
        .with(Tremolo::default())
        .with(stage(EffectKind::Reverb, 0.5, "missing/ir.wav"));
    let err = chain.process(&input).unwrap_err();
    assert_eq!(err.error_code(), "IR_LOAD");
}

#[test]
fn test_reverb_with_cached_ir_matches_uncached() {
    let dir = tempdir().unwrap();
    let ir = write_ir(&dir, "room.wav", 4096, 48000);
    let input = guitar_like(0.2);
    let stages = vec![stage(EffectKind::Reverb, 0.4, &ir)];

    let cache = Arc::new(IrCache::new());
    let cached = ChainProcessor::with_impulses(cache.clone());
    let first = cached.run(&input, &stages).unwrap();
    let second = cached.run(&input, &stages).unwrap();
    let uncached = ChainProcessor::new().run(&input, &stages).unwrap();

    assert_eq!(cache.len(), 1);
    assert!(first.buffer.is_identical_to(&second.buffer));
    assert!(first.buffer.is_approx_equal(&uncached.buffer, 1e-6));
}

// === Pedalboard ===

#[test]
fn test_pedalboard_file_drives_chain() {
    let dir = tempdir().unwrap();
    let board_path = dir.path().join("board.json");
    std::fs::write(
        &board_path,
        r#"{
            "delay": {"enabled": true, "delay_ms": 100},
            "overdrive": {"enabled": true, "gain": 4.0},
            "chorus": {"enabled": false}
        }"#,
    )
    .unwrap();

    let board = Pedalboard::load_json(&board_path).unwrap();
    let chain = board.to_chain();
    assert_eq!(chain.to_string(), "[Overdrive] → [Delay]");

    let out = chain.process(&guitar_like(0.2)).unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(out.applied, vec!["Overdrive", "Delay"]);
}

#[test]
fn test_board_reverb_needs_an_impulse_response() {
    let input = guitar_like(0.1);

    // No ir_path: falls back to the default, which is not shipped
    let board = Pedalboard::from_json(r#"{"reverb": {"enabled": true}}"#).unwrap();
    let err = board.to_chain().process(&input).unwrap_err();
    assert_eq!(err.error_code(), "IR_LOAD");
    assert!(err.to_string().contains(DEFAULT_IR_PATH), "{err}");
    assert!(err.recovery_hint().contains(DEFAULT_IR_PATH));

    let dir = tempdir().unwrap();
    let ir = write_ir(&dir, "room.wav", 1024, SR);
    let board = Pedalboard::from_json(&format!(
        r#"{{"reverb": {{"enabled": true, "ir_path": {ir:?}}}}}"#
    ))
    .unwrap();
    let out = board.to_chain().process(&input).unwrap();
    assert_eq!(out.applied, vec!["Reverb"]);
    assert_eq!(out.buffer.len(), input.len());
}

// === Concurrency ===

#[test]
fn test_processor_shared_across_threads() {
    let processor = ChainProcessor::new();
    let stages = vec![
        EffectSpec::from(Distortion::default()),
        EffectSpec::from(Delay::default()),
    ];
    let input = guitar_like(0.1);
    let expected = processor.run(&input, &stages).unwrap().buffer;

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| processor.run(&input, &stages).unwrap().buffer))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_identical_to(&expected));
        }
    });
}
