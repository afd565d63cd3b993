//! Randomize: shuffle every beat of the song

use serde_json::{Map, Value};

use crate::error::ConstructionError;
use crate::schema::{EffectSchema, ParamSchema, Params};

use super::{BeatEffect, BeatStream, Effect, Materialization, materialize};

/// Uniform Fisher-Yates shuffle of the whole song. Without a seed every
/// run draws a fresh permutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Randomize {
    /// Never above `i64::MAX`, so it survives a trip through a definition.
    seed: Option<u64>,
}

impl Randomize {
    pub fn new(seed: Option<i64>) -> Result<Self, ConstructionError> {
        match seed {
            Some(s) if s < 0 => Err(ConstructionError::NegativeSeed(s)),
            seed => Ok(Self { seed: seed.map(|s| s as u64) }),
        }
    }

    pub fn seeded(seed: u32) -> Self {
        Self { seed: Some(u64::from(seed)) }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new("randomize", "Randomize", "Completely randomize the order of every beat.").param(
            ParamSchema::integer("seed", "Seed", "Optional random seed. The same seed always gives the same order.")
                .minimum(0)
                .example_value(Value::Null),
        )
    }

    pub(crate) fn construct(params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self::new(params.opt_int("seed"))?.into())
    }
}

impl BeatEffect for Randomize {
    fn name(&self) -> &'static str {
        "randomize"
    }

    fn materialization(&self) -> Materialization {
        Materialization::Full
    }

    fn apply<'a>(&'a self, beats: BeatStream<'a>) -> BeatStream<'a> {
        let seed = self.seed;
        materialize(beats, move |all| {
            let mut rng = match seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            rng.shuffle(all);
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        if let Some(seed) = self.seed {
            params.insert("seed".into(), Value::from(seed));
        }
        params
    }
}
