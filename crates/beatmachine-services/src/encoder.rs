//! Compressed export through an external ffmpeg process

use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use beatmachine_core::AudioSink;

use crate::error::{Result, ServiceError};

/// Kills and reaps the encoder if export bails out early.
struct ChildGuard {
    child: Child,
    finished: bool,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Everything the encoder wrote to stderr, lossily decoded. A read
/// failure is noted in the text instead of dropping what was read.
fn read_diagnostics(mut stderr: impl Read) -> String {
    let mut bytes = Vec::new();
    let result = stderr.read_to_end(&mut bytes);
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if let Err(e) = result {
        text.push_str(&format!(" (stderr read failed: {e})"));
    }
    text
}

/// Pipes raw `f32le` samples into ffmpeg, which encodes them as `format`.
#[derive(Debug, Clone)]
pub struct FfmpegSink {
    program: PathBuf,
    format: String,
    output: PathBuf,
}

impl FfmpegSink {
    pub fn new(program: impl Into<PathBuf>, format: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), format: format.into(), output: output.into() }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    fn args(&self, sample_rate: u32, channels: u16) -> Vec<String> {
        vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-f".into(),
            "f32le".into(),
            "-ar".into(),
            sample_rate.to_string(),
            "-ac".into(),
            channels.to_string(),
            "-i".into(),
            "pipe:0".into(),
            "-f".into(),
            self.format.clone(),
            self.output.display().to_string(),
        ]
    }
}

impl AudioSink for FfmpegSink {
    type Error = ServiceError;

    fn write(&mut self, samples: &[f32], sample_rate: u32, channels: u16) -> Result<()> {
        let child = Command::new(&self.program)
            .args(self.args(sample_rate, channels))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ServiceError::Encoder(format!("failed to start {}: {e}", self.program.display())))?;
        let mut guard = ChildGuard { child, finished: false };

        let stdin = guard.child.stdin.take();
        let stderr = guard.child.stderr.take();

        // stdin is fed from a scoped thread while stderr drains here.
        let (written, diagnostics) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                let Some(stdin) = stdin else { return Ok(()) };
                let mut pipe = BufWriter::new(stdin);
                for sample in samples {
                    pipe.write_all(&sample.to_le_bytes())?;
                }
                pipe.flush()
            });

            let diagnostics = stderr.map(read_diagnostics).unwrap_or_default();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("encoder writer panicked")));
            (written, diagnostics)
        });

        let status = guard.child.wait()?;
        guard.finished = true;

        if !status.success() {
            return Err(ServiceError::Encoder(format!("ffmpeg exited with {status}: {}", diagnostics.trim())));
        }
        written?;

        tracing::info!(output = %self.output.display(), format = %self.format, "encoded song");
        Ok(())
    }
}
