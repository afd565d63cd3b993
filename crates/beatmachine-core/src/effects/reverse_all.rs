//! Reverse-all: play the song's beats last to first

use serde_json::{Map, Value};

use crate::error::ConstructionError;
use crate::schema::{EffectSchema, Params};

use super::{BeatEffect, BeatStream, Effect, Materialization, materialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseAll;

impl ReverseAll {
    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new(
            "reverseb",
            "Reverse beat order",
            "Reverse beat order, so the last beat of the song plays first.",
        )
    }

    pub(crate) fn construct(_params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self.into())
    }
}

impl BeatEffect for ReverseAll {
    fn name(&self) -> &'static str {
        "reverseb"
    }

    fn materialization(&self) -> Materialization {
        Materialization::Full
    }

    fn apply<'a>(&'a self, beats: BeatStream<'a>) -> BeatStream<'a> {
        materialize(beats, |all| all.reverse())
    }

    fn params(&self) -> Map<String, Value> {
        Map::new()
    }
}
