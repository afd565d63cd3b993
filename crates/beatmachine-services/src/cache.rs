//! On-disk cache of located beat boundaries
//!
//! Beat location can be slow, so results are stored as small JSON files
//! keyed by a digest of the decoded audio and the locator's fingerprint.
//! A broken cache never fails a remix: read and write problems are logged
//! and treated as misses.

use std::fs;
use std::path::{Path, PathBuf};

use beatmachine_core::BeatLocator;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, ServiceError};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    locator: String,
    boundaries: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct BoundaryCache {
    dir: PathBuf,
}

impl BoundaryCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Hex SHA-256 over the samples, their layout and the locator fingerprint.
    pub fn key(signal: &[f32], channels: u16, sample_rate: u32, locator: &dyn BeatLocator) -> String {
        let mut hasher = Sha256::new();
        hasher.update(sample_rate.to_le_bytes());
        hasher.update(channels.to_le_bytes());
        for sample in signal {
            hasher.update(sample.to_le_bytes());
        }
        hasher.update(locator.fingerprint().as_bytes());
        hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn get(&self, key: &str) -> Option<Vec<usize>> {
        let path = self.entry_path(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to read boundary cache: {e}");
                return None;
            }
        };
        match serde_json::from_str::<CacheEntry>(&text) {
            Ok(entry) => Some(entry.boundaries),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring corrupt boundary cache entry: {e}");
                None
            }
        }
    }

    pub fn put(&self, key: &str, locator: &dyn BeatLocator, boundaries: &[usize]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let entry = CacheEntry { locator: locator.fingerprint(), boundaries: boundaries.to_vec() };
        let json = serde_json::to_string(&entry).map_err(|e| ServiceError::Cache(e.to_string()))?;
        fs::write(self.entry_path(key), json)?;
        Ok(())
    }

    /// Returns cached boundaries, or runs `locator` and stores its result.
    pub fn locate(
        &self,
        signal: &[f32],
        channels: u16,
        sample_rate: u32,
        locator: &dyn BeatLocator,
    ) -> beatmachine_core::Result<Vec<usize>> {
        let key = Self::key(signal, channels, sample_rate, locator);
        if let Some(boundaries) = self.get(&key) {
            tracing::debug!(key = %key, beats = boundaries.len(), "boundary cache hit");
            return Ok(boundaries);
        }

        let boundaries = locator.locate_beats(signal, channels, sample_rate)?;
        if let Err(e) = self.put(&key, locator, &boundaries) {
            tracing::warn!("failed to write boundary cache: {e}");
        }
        Ok(boundaries)
    }
}
