//! Periodic selection engine shared by the per-beat effects

use serde_json::{Map, Value};

use crate::beat::Beat;
use crate::error::ConstructionError;
use crate::schema::ParamSchema;

use super::BeatStream;

/// Picks which beats a per-beat effect touches.
///
/// After skipping `offset` beats, beat `j` (counted from zero) is selected
/// when `(j - 1) mod period == 0`. With `period == 1` that is every beat;
/// otherwise the first post-offset beat is never selected and selection
/// starts at `j == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Periodic {
    period: usize,
    offset: usize,
}

impl Default for Periodic {
    fn default() -> Self {
        Self { period: 1, offset: 0 }
    }
}

impl Periodic {
    pub fn new(period: i64, offset: i64) -> Result<Self, ConstructionError> {
        if period <= 0 {
            return Err(ConstructionError::NonPositivePeriod(period));
        }
        if offset < 0 {
            return Err(ConstructionError::NegativeOffset(offset));
        }
        Ok(Self { period: period as usize, offset: offset as usize })
    }

    /// Every `period`th beat with no offset. `period` must be non-zero.
    pub(crate) const fn every(period: usize) -> Self {
        Self { period, offset: 0 }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn selects(&self, index: usize) -> bool {
        if index < self.offset {
            return false;
        }
        let j = index - self.offset;
        // (j - 1) mod period, without going negative at j == 0
        (j + self.period - 1) % self.period == 0
    }

    /// Runs `process` over every selected beat. A `None` result drops it.
    pub fn run<'a, F>(self, beats: BeatStream<'a>, process: F) -> BeatStream<'a>
    where
        F: Fn(Beat) -> Option<Beat> + 'a,
    {
        Box::new(beats.enumerate().filter_map(move |(i, beat)| {
            if self.selects(i) { process(beat) } else { Some(beat) }
        }))
    }

    pub(crate) fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("period".into(), Value::from(self.period));
        params.insert("offset".into(), Value::from(self.offset));
        params
    }

    /// Schema entries for `period` and `offset`.
    pub(crate) fn schema(min_period: i64) -> [ParamSchema; 2] {
        [
            ParamSchema::integer("period", "Period", "How often to apply this effect.")
                .minimum(min_period)
                .default_value(min_period),
            ParamSchema::integer("offset", "Offset", "How many beats to wait before applying this effect.")
                .minimum(0)
                .default_value(0),
        ]
    }
}

/// A per-beat transform driven by a [`Periodic`] selector.
pub trait PeriodicEffect {
    fn periodic(&self) -> &Periodic;
    fn process_beat(&self, beat: Beat) -> Option<Beat>;
    /// Parameters beyond `period` and `offset`.
    fn extra_params(&self, _params: &mut Map<String, Value>) {}
}

/// Implements `BeatEffect` for a `PeriodicEffect`.
/// Usage: `impl_periodic_effect!(StructName, "registry-name");`
macro_rules! impl_periodic_effect {
    ($ty:ty, $name:expr) => {
        impl $crate::effects::BeatEffect for $ty {
            fn name(&self) -> &'static str { $name }

            fn apply<'a>(&'a self, beats: $crate::effects::BeatStream<'a>) -> $crate::effects::BeatStream<'a> {
                use $crate::effects::PeriodicEffect;
                self.periodic().run(beats, move |beat| self.process_beat(beat))
            }

            fn params(&self) -> serde_json::Map<String, serde_json::Value> {
                use $crate::effects::PeriodicEffect;
                let mut params = self.periodic().params();
                self.extra_params(&mut params);
                params
            }
        }
    };
}

pub(crate) use impl_periodic_effect;
