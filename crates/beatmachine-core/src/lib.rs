//! beatmachine-core: Beats, beat effects and the effect registry

pub mod backend;
mod beat;
mod beats;
pub mod effects;
mod error;
pub mod registry;
pub mod schema;

pub use backend::{BeatLocator, BpmLocator};
pub use beat::Beat;
pub use beats::{AudioSink, BeatSequence};
pub use effects::{BeatEffect, BeatStream, Effect, Materialization};
pub use effects::{Cut, Randomize, Remap, Remove, Repeat, Reverse, ReverseAll, Silence, Swap};
pub use error::{ConstructionError, DefinitionError, Error, ErrorKind, Result};
pub use registry::EffectRegistry;
pub use schema::{EffectSchema, ParamKind, ParamSchema, Params};
