//! beatmachine-services: Audio I/O, encoding and the boundary cache

pub mod cache;
pub mod encoder;
pub mod error;
pub mod song;
pub mod wav;

pub use cache::BoundaryCache;
pub use encoder::FfmpegSink;
pub use error::{Result, ServiceError};
pub use song::{OutputFormat, export_song, load_song};
pub use wav::{DecodedAudio, WavSink, read_wav};
