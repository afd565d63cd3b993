//! Reverse: play selected beats backwards

use crate::beat::Beat;
use crate::error::ConstructionError;
use crate::schema::{EffectSchema, Params};

use super::periodic::impl_periodic_effect;
use super::{Effect, Periodic, PeriodicEffect};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reverse {
    periodic: Periodic,
}

impl Reverse {
    pub fn new(period: i64, offset: i64) -> Result<Self, ConstructionError> {
        Ok(Self { periodic: Periodic::new(period, offset)? })
    }

    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new("reverse", "Reverse", "Reverse beats.").params(Periodic::schema(1))
    }

    pub(crate) fn construct(params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self::new(params.int("period")?, params.int("offset")?)?.into())
    }
}

impl PeriodicEffect for Reverse {
    fn periodic(&self) -> &Periodic {
        &self.periodic
    }

    fn process_beat(&self, beat: Beat) -> Option<Beat> {
        Some(beat.reversed())
    }
}

impl_periodic_effect!(Reverse, "reverse");
