//! Silence: zero out selected beats, keeping their length

use crate::beat::Beat;
use crate::error::ConstructionError;
use crate::schema::{EffectSchema, Params};

use super::periodic::impl_periodic_effect;
use super::{Effect, Periodic, PeriodicEffect};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Silence {
    periodic: Periodic,
}

impl Silence {
    pub fn new(period: i64, offset: i64) -> Result<Self, ConstructionError> {
        Ok(Self { periodic: Periodic::new(period, offset)? })
    }

    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new("silence", "Silence", "Silence beats, keeping their length.")
            .params(Periodic::schema(1))
    }

    pub(crate) fn construct(params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self::new(params.int("period")?, params.int("offset")?)?.into())
    }
}

impl PeriodicEffect for Silence {
    fn periodic(&self) -> &Periodic {
        &self.periodic
    }

    fn process_beat(&self, beat: Beat) -> Option<Beat> {
        Some(beat.silenced())
    }
}

impl_periodic_effect!(Silence, "silence");
