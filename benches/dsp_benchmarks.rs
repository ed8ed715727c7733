//! DSP Benchmarks
//!
//! Performance benchmarks for the pedals and the full chain.

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stompbox::dsp::{
    convolve_truncated, EffectChain, EffectKind, ImpulseSource, Pedal, ProcessContext,
};
use stompbox::engine::AudioBuffer;

/// Reverb source that never touches the disk
struct SyntheticRoom(Vec<f32>);

impl ImpulseSource for SyntheticRoom {
    fn load(&self, _path: &Path, _working_rate: u32) -> stompbox::Result<std::sync::Arc<[f32]>> {
        Ok(self.0.clone().into())
    }
}

fn room() -> SyntheticRoom {
    SyntheticRoom((0..22050).map(|i| 0.5 * (-(i as f32) / 4000.0).exp()).collect())
}

fn benchmark_pedals(c: &mut Criterion) {
    let buffer = AudioBuffer::demo_tone();
    let room = room();
    let ctx = ProcessContext::new(buffer.sample_rate(), &room);

    for kind in EffectKind::ALL {
        let effect = kind.default_effect();
        c.bench_function(&format!("{}_2s_mono", kind.name().to_lowercase()), |b| {
            b.iter(|| effect.apply(black_box(buffer.samples()), &ctx).unwrap())
        });
    }
}

fn benchmark_convolution(c: &mut Criterion) {
    let buffer = AudioBuffer::demo_tone();
    let ir = room().0;

    c.bench_function("convolve_2s_with_0.5s_ir", |b| {
        b.iter(|| convolve_truncated(black_box(buffer.samples()), black_box(&ir)))
    });
}

fn benchmark_chain(c: &mut Criterion) {
    let buffer = AudioBuffer::demo_tone();
    let chain = EffectChain::new()
        .with(stompbox::dsp::Compressor::default())
        .with(stompbox::dsp::Overdrive::default())
        .with(stompbox::dsp::Equalizer::default())
        .with(stompbox::dsp::Chorus::default())
        .with(stompbox::dsp::Delay::default());

    c.bench_function(&format!("chain_{}_pedals_2s", chain.len()), |b| {
        b.iter(|| chain.process(black_box(&buffer)).unwrap())
    });

    // Single pedal through the trait, for comparison with the enum dispatch
    let tremolo = stompbox::dsp::Tremolo::default();
    let ctx = ProcessContext::offline(buffer.sample_rate());
    c.bench_function("tremolo_2s_direct", |b| {
        b.iter(|| Pedal::apply(&tremolo, black_box(buffer.samples()), &ctx).unwrap())
    });
}

criterion_group!(benches, benchmark_pedals, benchmark_convolution, benchmark_chain);
criterion_main!(benches);
