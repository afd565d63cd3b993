//! Beat-boundary detection backends

use crate::error::{Error, Result};

/// Finds where beats start in a decoded signal.
pub trait BeatLocator {
    /// Frame indices where beats begin: strictly increasing and inside the
    /// signal.
    fn locate_beats(&self, signal: &[f32], channels: u16, sample_rate: u32) -> Result<Vec<usize>>;

    /// Identifies the locator and its settings, used as part of cache keys.
    fn fingerprint(&self) -> String;
}

/// Fixed-tempo locator: one beat every `60 / bpm` seconds starting at
/// `first_beat_ms`. Fast, but drifts on songs whose tempo wanders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmLocator {
    bpm: f64,
    first_beat_ms: f64,
}

impl BpmLocator {
    pub fn new(bpm: f64, first_beat_ms: f64) -> Result<Self> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(Error::InvalidLocator(format!("bpm must be > 0, but was {bpm}")));
        }
        if !(first_beat_ms.is_finite() && first_beat_ms >= 0.0) {
            return Err(Error::InvalidLocator(format!("first beat must be >= 0 ms, but was {first_beat_ms}")));
        }
        Ok(Self { bpm, first_beat_ms })
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn first_beat_ms(&self) -> f64 {
        self.first_beat_ms
    }
}

impl BeatLocator for BpmLocator {
    fn locate_beats(&self, signal: &[f32], channels: u16, sample_rate: u32) -> Result<Vec<usize>> {
        let frames = signal.len() / channels.max(1) as usize;
        let frames_per_beat = ((60.0 * sample_rate as f64) / self.bpm) as usize;
        let downbeat = (sample_rate as f64 * self.first_beat_ms / 1000.0) as usize;

        let boundaries: Vec<usize> = (downbeat..frames).step_by(frames_per_beat.max(1)).collect();
        tracing::debug!(bpm = self.bpm, frames_per_beat, beats = boundaries.len(), "located beats by tempo");
        Ok(boundaries)
    }

    fn fingerprint(&self) -> String {
        format!("bpm:{}:{}", self.bpm, self.first_beat_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_tempo_boundaries() {
        let locator = BpmLocator::new(120.0, 0.0).unwrap();
        // 1000 Hz, 120 bpm: a beat every 500 frames
        let signal = vec![0.0; 1600 * 2];
        assert_eq!(locator.locate_beats(&signal, 2, 1000).unwrap(), vec![0, 500, 1000, 1500]);
    }

    #[test]
    fn test_first_beat_offset() {
        let locator = BpmLocator::new(120.0, 250.0).unwrap();
        let signal = vec![0.0; 1600];
        assert_eq!(locator.locate_beats(&signal, 1, 1000).unwrap(), vec![250, 750, 1250]);
    }

    #[test]
    fn test_downbeat_past_end() {
        let locator = BpmLocator::new(120.0, 5000.0).unwrap();
        assert!(locator.locate_beats(&[0.0; 100], 1, 1000).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_tempo() {
        assert!(BpmLocator::new(0.0, 0.0).is_err());
        assert!(BpmLocator::new(f64::NAN, 0.0).is_err());
        assert!(BpmLocator::new(120.0, -1.0).is_err());
    }
}
