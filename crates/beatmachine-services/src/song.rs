//! Loading songs as beat sequences and exporting remixes

use std::path::Path;

use beatmachine_core::{BeatLocator, BeatSequence};

use crate::cache::BoundaryCache;
use crate::encoder::FfmpegSink;
use crate::error::{Result, ServiceError};
use crate::wav::{WavSink, read_wav};

/// Container an exported song is written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Wav,
    /// Any format name ffmpeg understands (`mp3`, `flac`, `ogg`, ...).
    Encoded(String),
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "" => Err(ServiceError::UnsupportedFormat("empty format name".into())),
            "wav" | "wave" => Ok(Self::Wav),
            _ => Ok(Self::Encoded(name)),
        }
    }

    /// Format implied by the extension of `path`, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_name(ext).ok()
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Wav => "wav",
            Self::Encoded(name) => name,
        }
    }
}

/// Decodes a WAV file and splits it into beats. Boundaries come from
/// `cache` when one is given and already holds them.
pub fn load_song(path: &Path, locator: &dyn BeatLocator, cache: Option<&BoundaryCache>) -> Result<BeatSequence> {
    let audio = read_wav(path)?;
    let boundaries = match cache {
        Some(cache) => cache.locate(&audio.samples, audio.channels, audio.sample_rate, locator)?,
        None => locator.locate_beats(&audio.samples, audio.channels, audio.sample_rate)?,
    };
    let beats = BeatSequence::from_signal(&audio.samples, audio.channels, audio.sample_rate, &boundaries)?;

    tracing::info!(path = %path.display(), beats = beats.len(), "loaded song");
    Ok(beats)
}

/// Writes `beats` to `path`, in-process for WAV and through `ffmpeg`
/// for everything else.
pub fn export_song(beats: &BeatSequence, path: &Path, format: &OutputFormat, ffmpeg: &Path) -> Result<()> {
    match format {
        OutputFormat::Wav => beats.export(&mut WavSink::new(path)),
        OutputFormat::Encoded(name) => beats.export(&mut FfmpegSink::new(ffmpeg, name.as_str(), path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatmachine_core::{BpmLocator, EffectRegistry};
    use beatmachine_core::AudioSink;

    fn write_ramp(path: &Path, frames: usize) {
        let samples: Vec<f32> = (0..frames).map(|i| i as f32 / frames as f32).collect();
        WavSink::new(path).write(&samples, 4, 1).unwrap();
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("WAV").unwrap(), OutputFormat::Wav);
        assert_eq!(OutputFormat::from_name("mp3").unwrap(), OutputFormat::Encoded("mp3".into()));
        assert!(OutputFormat::from_name(" ").is_err());
        assert_eq!(OutputFormat::from_path(Path::new("out.flac")), Some(OutputFormat::Encoded("flac".into())));
        assert_eq!(OutputFormat::from_path(Path::new("out")), None);
    }

    #[test]
    fn test_load_split_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_ramp(&input, 16);

        // 60 bpm at 4 Hz: four frames per beat
        let locator = BpmLocator::new(60.0, 0.0).unwrap();
        let cache = BoundaryCache::new(dir.path().join("cache"));
        let song = load_song(&input, &locator, Some(&cache)).unwrap();
        assert_eq!(song.len(), 4);

        let chain = EffectRegistry::global().load_chain_str(r#"[{"type": "reverseb"}]"#).unwrap();
        let remixed = song.apply_all(&chain);
        export_song(&remixed, &output, &OutputFormat::Wav, Path::new("ffmpeg")).unwrap();

        let written = read_wav(&output).unwrap();
        assert_eq!(written.samples.len(), 16);
        assert_eq!(written.samples[..4], song.beats()[3].samples()[..]);
        assert!(cache.dir().read_dir().unwrap().next().is_some());
    }

    #[test]
    fn test_encoder_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let song = BeatSequence::new(8000, 1, Vec::new());
        let err = export_song(
            &song,
            &dir.path().join("out.mp3"),
            &OutputFormat::Encoded("mp3".into()),
            &dir.path().join("missing-ffmpeg"),
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Encoder(_)));
    }
}
