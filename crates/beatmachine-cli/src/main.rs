//! beatmachine: Remix songs by rearranging their beats

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use beatmachine_core::{BpmLocator, EffectRegistry};
use beatmachine_services::{BoundaryCache, OutputFormat, export_song, load_song};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "beatmachine")]
#[command(about = "Remix songs by rearranging their beats", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an effect chain to a song
    Remix {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; the extension picks the format unless --format is given
        #[arg(short, long)]
        output: PathBuf,

        /// Effect chain as JSON, or @path to read it from a file
        #[arg(short, long)]
        effects: String,

        /// Song tempo in beats per minute
        #[arg(short, long)]
        bpm: f64,

        /// Position of the first beat in milliseconds (default from config, else 0)
        #[arg(long)]
        first_beat_ms: Option<f64>,

        /// Output format, e.g. wav, mp3, flac
        #[arg(short, long)]
        format: Option<String>,

        /// Always run beat location, ignoring cached boundaries
        #[arg(long)]
        no_cache: bool,
    },

    /// Print the JSON Schema for effect definitions
    Schema {
        /// Only this effect
        #[arg(short, long)]
        effect: Option<String>,

        /// Schema for a whole chain instead of a single effect
        #[arg(long, conflicts_with = "effect")]
        list: bool,
    },

    /// List available effects with an example definition for each
    Effects,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "beatmachine=info",
        1 => "beatmachine=debug",
        _ => "beatmachine=trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    let registry = EffectRegistry::global();
    match cli.command {
        Commands::Remix { input, output, effects, bpm, first_beat_ms, format, no_cache } => {
            let config = config::load_config();
            let remix = Remix { input, output, effects, bpm, first_beat_ms, format, no_cache };
            run_remix(registry, &config, remix)
        }
        Commands::Schema { effect, list } => {
            let schema = match effect {
                Some(name) => match registry.dump_single_effect_schema(&name) {
                    Some(schema) => schema,
                    None => bail!("unknown effect {name:?}"),
                },
                None if list => registry.dump_list_schema(),
                None => registry.dump_schema(),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Commands::Effects => {
            for schema in registry.schemas() {
                println!("{:<10} {}", schema.name, schema.title);
                println!("{:<10} {}", "", serde_json::to_string(&schema.example())?);
            }
            Ok(())
        }
    }
}

struct Remix {
    input: PathBuf,
    output: PathBuf,
    effects: String,
    bpm: f64,
    first_beat_ms: Option<f64>,
    format: Option<String>,
    no_cache: bool,
}

fn run_remix(registry: &EffectRegistry, config: &config::Config, remix: Remix) -> Result<()> {
    let definitions = read_effects_arg(&remix.effects)?;
    let chain = registry.load_chain_str(&definitions).context("invalid effect chain")?;
    let format = resolve_format(remix.format.as_deref(), &remix.output, &config.default_format)?;
    let locator = BpmLocator::new(remix.bpm, remix.first_beat_ms.unwrap_or(config.first_beat_ms))?;

    tracing::info!(effects = chain.len(), format = format.name(), "remixing {}", remix.input.display());

    let cache = (config.use_cache && !remix.no_cache).then(|| BoundaryCache::new(config.cache_dir()));
    let song = load_song(&remix.input, &locator, cache.as_ref())
        .with_context(|| format!("failed to load {}", remix.input.display()))?;

    let remixed = song.apply_all(&chain);
    export_song(&remixed, &remix.output, &format, &config.ffmpeg_path)
        .with_context(|| format!("failed to write {}", remix.output.display()))?;

    tracing::info!(beats_in = song.len(), beats_out = remixed.len(), "wrote {}", remix.output.display());
    Ok(())
}

/// Inline JSON, or the contents of the file named after a leading `@`.
fn read_effects_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read effects from {path}")),
        None => Ok(arg.to_string()),
    }
}

/// `--format` wins, then the output extension, then the configured default.
fn resolve_format(flag: Option<&str>, output: &Path, default: &str) -> Result<OutputFormat> {
    if let Some(name) = flag {
        return Ok(OutputFormat::from_name(name)?);
    }
    if let Some(format) = OutputFormat::from_path(output) {
        return Ok(format);
    }
    Ok(OutputFormat::from_name(default)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remix() {
        let cli = Cli::try_parse_from([
            "beatmachine", "-v", "remix", "-i", "in.wav", "-o", "out.mp3", "-e", "[]", "--bpm", "128",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Remix { bpm, no_cache, format, .. } => {
                assert_eq!(bpm, 128.0);
                assert!(!no_cache);
                assert!(format.is_none());
            }
            _ => panic!("expected remix"),
        }
    }

    #[test]
    fn test_remix_requires_bpm() {
        assert!(Cli::try_parse_from(["beatmachine", "remix", "-i", "a.wav", "-o", "b.wav", "-e", "[]"]).is_err());
    }

    #[test]
    fn test_resolve_format_precedence() {
        let out = Path::new("song.flac");
        assert_eq!(resolve_format(Some("mp3"), out, "wav").unwrap(), OutputFormat::Encoded("mp3".into()));
        assert_eq!(resolve_format(None, out, "wav").unwrap(), OutputFormat::Encoded("flac".into()));
        assert_eq!(resolve_format(None, Path::new("song"), "wav").unwrap(), OutputFormat::Wav);
    }

    #[test]
    fn test_effects_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        std::fs::write(&path, r#"[{"type": "reverseb"}]"#).unwrap();

        let text = read_effects_arg(&format!("@{}", path.display())).unwrap();
        assert_eq!(text, r#"[{"type": "reverseb"}]"#);
        assert_eq!(read_effects_arg("[]").unwrap(), "[]");
        assert!(read_effects_arg("@/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_bad_chain_fails_before_decoding() {
        let remix = Remix {
            input: PathBuf::from("/definitely/not/here.wav"),
            output: PathBuf::from("out.wav"),
            effects: r#"[{"type": "swap", "x_position": 2, "y_position": 2}]"#.into(),
            bpm: 120.0,
            first_beat_ms: None,
            format: None,
            no_cache: true,
        };
        let err = run_remix(EffectRegistry::global(), &config::Config::default(), remix).unwrap_err();
        assert!(err.to_string().contains("invalid effect chain"));
    }
}
