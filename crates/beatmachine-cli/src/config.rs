use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Encoder used for anything other than WAV output.
    pub ffmpeg_path: PathBuf,
    /// Output format when `--format` is absent and the output path has no
    /// recognizable extension.
    pub default_format: String,
    pub cache_dir: Option<PathBuf>,
    pub use_cache: bool,
    pub first_beat_ms: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            default_format: "wav".into(),
            cache_dir: None,
            use_cache: true,
            first_beat_ms: 0.0,
        }
    }
}

impl Config {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("beatmachine")
                .join("beats")
        })
    }
}

pub(crate) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("beatmachine")
        .join("config.toml")
}

pub(crate) fn load_config() -> Config {
    let path = config_path();
    let Ok(text) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    parse_config(&text).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), "ignoring invalid config: {e}");
        Config::default()
    })
}

fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}
