//! Audio file I/O operations
//!
//! Handles loading and saving WAV files using the hound crate. Everything is
//! brought into the mono float representation the pedals work on: integer PCM
//! is scaled to -1.0..1.0 and multi-channel files are averaged to mono.

use std::io::{Cursor, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::AudioBuffer;
use crate::error::{Result, StompboxError};

/// Load a WAV file into a mono AudioBuffer
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let (samples, sample_rate) = read_mono(path.as_ref())?;
    Ok(AudioBuffer::new(samples, sample_rate))
}

/// Read a WAV file as mono float samples plus its native sample rate
pub(crate) fn read_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let reader = WavReader::open(path).map_err(|e| StompboxError::AudioReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    decode_mono(reader, path)
}

/// Decode in-memory WAV bytes; `path` only labels errors
pub(crate) fn read_mono_bytes(bytes: &[u8], path: &Path) -> Result<(Vec<f32>, u32)> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| StompboxError::AudioReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    decode_mono(reader, path)
}

fn decode_mono<R: Read>(reader: WavReader<R>, path: &Path) -> Result<(Vec<f32>, u32)> {
    let read_err = |e| StompboxError::AudioReadError {
        path: path.display().to_string(),
        source: e,
    };

    let spec = reader.spec();
    let channels = spec.channels as usize;

    if channels == 0 {
        return Err(StompboxError::UnsupportedFormat {
            details: format!("{} declares zero channels", path.display()),
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map_err(read_err))
            .collect::<Result<Vec<f32>>>()?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(StompboxError::UnsupportedFormat {
                    details: format!("{}-bit integer PCM", spec.bits_per_sample),
                });
            }
            let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val).map_err(read_err))
                .collect::<Result<Vec<f32>>>()?
        }
    };

    Ok((downmix(&interleaved, channels), spec.sample_rate))
}

/// Average interleaved frames down to a single channel
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Save an AudioBuffer to a mono WAV file (32-bit float)
pub fn save_wav<P: AsRef<Path>>(buffer: &AudioBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let write_err = |e| StompboxError::AudioWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_err)?;
    for &sample in buffer.samples() {
        writer.write_sample(sample).map_err(write_err)?;
    }
    writer.finalize().map_err(write_err)?;

    Ok(())
}
