//! Remove: drop selected beats entirely

use crate::beat::Beat;
use crate::error::ConstructionError;
use crate::schema::{EffectSchema, Params};

use super::periodic::impl_periodic_effect;
use super::{Effect, Periodic, PeriodicEffect};

#[derive(Debug, Clone, PartialEq)]
pub struct Remove {
    periodic: Periodic,
}

impl Default for Remove {
    fn default() -> Self {
        Self { periodic: Periodic::every(2) }
    }
}

impl Remove {
    /// `period` must be at least 2; a period of 1 would remove the whole song.
    pub fn new(period: i64, offset: i64) -> Result<Self, ConstructionError> {
        if period < 2 {
            return Err(ConstructionError::RemovePeriodTooSmall(period));
        }
        Ok(Self { periodic: Periodic::new(period, offset)? })
    }

    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new("remove", "Remove", "Completely remove beats. The period must be at least 2.")
            .params(Periodic::schema(2))
    }

    pub(crate) fn construct(params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self::new(params.int("period")?, params.int("offset")?)?.into())
    }
}

impl PeriodicEffect for Remove {
    fn periodic(&self) -> &Periodic {
        &self.periodic
    }

    fn process_beat(&self, _beat: Beat) -> Option<Beat> {
        None
    }
}

impl_periodic_effect!(Remove, "remove");
