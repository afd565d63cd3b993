//! WAV decoding and writing

use std::path::{Path, PathBuf};

use beatmachine_core::AudioSink;

use crate::error::{Result, ServiceError};

/// An interleaved, normalized signal decoded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }
}

/// Reads a WAV file into `[-1, 1]` floats, keeping its channel layout.
pub fn read_wav(path: &Path) -> Result<DecodedAudio> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_val))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    tracing::info!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        "decoded WAV"
    );
    Ok(DecodedAudio { samples, sample_rate: spec.sample_rate, channels: spec.channels })
}

/// Writes 32-bit float WAV files.
#[derive(Debug, Clone)]
pub struct WavSink {
    path: PathBuf,
}

impl WavSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioSink for WavSink {
    type Error = ServiceError;

    fn write(&mut self, samples: &[f32], sample_rate: u32, channels: u16) -> Result<()> {
        if channels == 0 {
            return Err(ServiceError::UnsupportedFormat("cannot write a WAV with no channels".into()));
        }
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&self.path, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        tracing::info!(path = %self.path.display(), samples = samples.len(), "wrote WAV");
        Ok(())
    }
}
