//! Impulse responses for the convolution reverb
//!
//! An impulse response is read from a WAV file, averaged to mono and mapped to
//! the working sample rate by nearest-neighbour index lookup. The lookup is
//! cheap and lossy: no anti-alias filtering is applied.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::engine::io::{read_mono, read_mono_bytes};
use crate::error::{Result, StompboxError};

/// Supplies impulse responses already prepared for a working sample rate
pub trait ImpulseSource: Send + Sync {
    /// Mono impulse response at `working_rate`
    ///
    /// Any failure is fatal for the reverb stage that asked for it.
    fn load(&self, path: &Path, working_rate: u32) -> Result<Arc<[f32]>>;
}

/// Map `ir` from `native_rate` to `working_rate` by nearest-neighbour lookup
///
/// The result has `round(len * working_rate / native_rate)` samples; sample `i`
/// is `ir[round(i / ratio)]`, clamped to the last input sample.
pub fn resample_nearest(ir: &[f32], native_rate: u32, working_rate: u32) -> Vec<f32> {
    if native_rate == working_rate || ir.is_empty() {
        return ir.to_vec();
    }
    let ratio = working_rate as f64 / native_rate as f64;
    let out_len = (ir.len() as f64 * ratio).round() as usize;
    let last = ir.len() - 1;
    (0..out_len)
        .map(|i| ir[((i as f64 / ratio).round() as usize).min(last)])
        .collect()
}

/// Check and resample decoded IR samples
fn prepare(path: &Path, samples: Vec<f32>, native_rate: u32, working_rate: u32) -> Result<Arc<[f32]>> {
    let invalid = |details: &str| StompboxError::InvalidImpulseResponse {
        path: path.display().to_string(),
        details: details.to_string(),
    };
    if native_rate == 0 {
        return Err(invalid("sample rate is zero"));
    }
    if samples.is_empty() {
        return Err(invalid("no samples"));
    }
    let resampled = resample_nearest(&samples, native_rate, working_rate);
    if resampled.is_empty() {
        return Err(invalid("no samples left after resampling"));
    }
    Ok(resampled.into())
}

fn load_failed(path: &Path, source: StompboxError) -> StompboxError {
    match source {
        // Already carries the path
        StompboxError::InvalidImpulseResponse { .. } => source,
        other => StompboxError::ImpulseResponseLoad {
            path: path.display().to_string(),
            source: Box::new(other),
        },
    }
}

/// Reads the impulse response from disk on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImpulses;

impl ImpulseSource for FileImpulses {
    fn load(&self, path: &Path, working_rate: u32) -> Result<Arc<[f32]>> {
        let (samples, native_rate) = read_mono(path).map_err(|e| load_failed(path, e))?;
        info!(
            path = %path.display(),
            native_rate,
            working_rate,
            len = samples.len(),
            "loaded impulse response"
        );
        prepare(path, samples, native_rate, working_rate)
    }
}

#[derive(Debug)]
struct CachedImpulse {
    digest: [u8; 32],
    samples: Arc<[f32]>,
}

/// Keeps prepared impulse responses keyed by path and working rate
///
/// Every lookup re-reads the file and compares its SHA-256 digest with the
/// cached one, so an impulse response edited on disk is never served stale.
/// Only decoding and resampling are skipped on a hit.
#[derive(Debug, Default)]
pub struct IrCache {
    entries: Mutex<HashMap<(PathBuf, u32), CachedImpulse>>,
}

impl IrCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached impulse responses
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached impulse response
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ImpulseSource for IrCache {
    fn load(&self, path: &Path, working_rate: u32) -> Result<Arc<[f32]>> {
        let bytes = std::fs::read(path).map_err(|e| load_failed(path, e.into()))?;
        let digest: [u8; 32] = Sha256::digest(&bytes).into();
        let key = (path.to_path_buf(), working_rate);

        {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = entries.get(&key) {
                if cached.digest == digest {
                    debug!(path = %path.display(), working_rate, "impulse response cache hit");
                    return Ok(Arc::clone(&cached.samples));
                }
                debug!(path = %path.display(), "impulse response changed on disk");
            }
        }

        let (samples, native_rate) =
            read_mono_bytes(&bytes, path).map_err(|e| load_failed(path, e))?;
        let prepared = prepare(path, samples, native_rate, working_rate)?;
        debug!(path = %path.display(), working_rate, "impulse response cache miss");

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key,
                CachedImpulse {
                    digest,
                    samples: Arc::clone(&prepared),
                },
            );
        Ok(prepared)
    }
}
