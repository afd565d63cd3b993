//! The beat sequence a song is remixed as

use crate::backend::BeatLocator;
use crate::beat::Beat;
use crate::effects::{BeatStream, Effect};
use crate::error::{Error, Result};

/// Destination for a flattened song, such as a WAV writer or an encoder
/// process.
pub trait AudioSink {
    type Error: From<Error>;

    fn write(&mut self, samples: &[f32], sample_rate: u32, channels: u16) -> std::result::Result<(), Self::Error>;
}

/// Ordered beats sharing one sample rate and channel count. Applying an
/// effect never mutates the sequence; it returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatSequence {
    sample_rate: u32,
    channels: u16,
    beats: Vec<Beat>,
}

impl BeatSequence {
    pub fn new(sample_rate: u32, channels: u16, beats: Vec<Beat>) -> Self {
        Self { sample_rate, channels, beats }
    }

    /// Splits an interleaved signal at frame `boundaries`. The first beat
    /// starts at frame 0 and the last one runs to the end of the signal.
    /// Boundaries must be strictly increasing and inside the signal.
    pub fn from_signal(signal: &[f32], channels: u16, sample_rate: u32, boundaries: &[usize]) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidBoundaries("signal has no channels".into()));
        }
        let width = channels as usize;
        let frames = signal.len() / width;

        if let Some(pair) = boundaries.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::InvalidBoundaries(format!(
                "boundaries must be strictly increasing, got {} then {}",
                pair[0], pair[1]
            )));
        }
        if let Some(&last) = boundaries.last() {
            if last >= frames {
                return Err(Error::InvalidBoundaries(format!(
                    "boundary {last} is past the end of a {frames}-frame signal"
                )));
            }
        }

        let mut beats = Vec::with_capacity(boundaries.len() + 1);
        let mut start = 0;
        for &end in boundaries.iter().chain(std::iter::once(&frames)) {
            if end > start {
                beats.push(Beat::new(channels, signal[start * width..end * width].to_vec()));
            }
            start = end;
        }

        tracing::debug!(beats = beats.len(), frames, sample_rate, "split signal into beats");
        Ok(Self { sample_rate, channels, beats })
    }

    /// Asks `locator` for boundaries and splits the signal at them.
    pub fn from_song(signal: &[f32], channels: u16, sample_rate: u32, locator: &dyn BeatLocator) -> Result<Self> {
        let boundaries = locator.locate_beats(signal, channels, sample_rate)?;
        Self::from_signal(signal, channels, sample_rate, &boundaries)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn into_beats(self) -> Vec<Beat> {
        self.beats
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Total length in frames.
    pub fn frames(&self) -> usize {
        self.beats.iter().map(Beat::frames).sum()
    }

    pub fn apply(&self, effect: &Effect) -> Self {
        self.apply_all(std::slice::from_ref(effect))
    }

    /// Applies `effects` left to right. Streaming effects are chained into
    /// one lazy pass; only effects that need the whole song buffer it.
    pub fn apply_all(&self, effects: &[Effect]) -> Self {
        let source: BeatStream<'_> = Box::new(self.beats.iter().cloned());
        let beats: Vec<Beat> = effects
            .iter()
            .fold(source, |beats, effect| {
                tracing::debug!(effect = effect.name(), materialization = ?effect.materialization(), "applying effect");
                effect.apply(beats)
            })
            .collect();

        tracing::debug!(before = self.beats.len(), after = beats.len(), "applied effect chain");
        Self { sample_rate: self.sample_rate, channels: self.channels, beats }
    }

    /// All beats back to back as one interleaved buffer.
    pub fn to_flat_array(&self) -> Result<Vec<f32>> {
        let mut flat = Vec::with_capacity(self.beats.iter().map(|b| b.samples().len()).sum());
        for (index, beat) in self.beats.iter().enumerate() {
            if beat.channels() != self.channels {
                return Err(Error::ChannelMismatch { index, expected: self.channels, found: beat.channels() });
            }
            flat.extend_from_slice(beat.samples());
        }
        Ok(flat)
    }

    pub fn export<S: AudioSink>(&self, sink: &mut S) -> std::result::Result<(), S::Error> {
        let flat = self.to_flat_array()?;
        tracing::info!(beats = self.beats.len(), frames = self.frames(), "exporting song");
        sink.write(&flat, self.sample_rate, self.channels)
    }
}
