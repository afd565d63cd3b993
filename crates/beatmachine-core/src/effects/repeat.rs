//! Repeat: play selected beats several times in a row

use serde_json::{Map, Value};

use crate::beat::Beat;
use crate::error::ConstructionError;
use crate::schema::{EffectSchema, ParamSchema, Params};

use super::periodic::impl_periodic_effect;
use super::{Effect, Periodic, PeriodicEffect};

#[derive(Debug, Clone, PartialEq)]
pub struct Repeat {
    periodic: Periodic,
    times: usize,
}

impl Default for Repeat {
    fn default() -> Self {
        Self { periodic: Periodic::default(), times: 2 }
    }
}

impl Repeat {
    pub fn new(period: i64, offset: i64, times: i64) -> Result<Self, ConstructionError> {
        if times < 2 {
            return Err(ConstructionError::TooFewRepeats(times));
        }
        Ok(Self { periodic: Periodic::new(period, offset)?, times: times as usize })
    }

    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new("repeat", "Repeat", "Repeat beats.")
            .params(Periodic::schema(1))
            .param(
                ParamSchema::integer(
                    "times",
                    "Times",
                    "How many times each affected beat is played. At least 2, since 1 would do nothing.",
                )
                .minimum(2)
                .default_value(2),
            )
    }

    pub(crate) fn construct(params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self::new(params.int("period")?, params.int("offset")?, params.int("times")?)?.into())
    }
}

impl PeriodicEffect for Repeat {
    fn periodic(&self) -> &Periodic {
        &self.periodic
    }

    fn process_beat(&self, beat: Beat) -> Option<Beat> {
        Some(beat.repeated(self.times))
    }

    fn extra_params(&self, params: &mut Map<String, Value>) {
        params.insert("times".into(), Value::from(self.times));
    }
}

impl_periodic_effect!(Repeat, "repeat");
