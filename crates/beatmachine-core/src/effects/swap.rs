//! Swap: exchange two beats inside every group

use serde_json::{Map, Value};

use crate::beat::Beat;
use crate::error::ConstructionError;
use crate::schema::{EffectSchema, ParamSchema, Params};

use super::{BeatEffect, BeatStream, Effect, Regroup};

/// Positions are given 1-based and stored reduced modulo the group size,
/// ordered low/high, so `swap(2, 4)` and `swap(4, 2)` compare equal.
/// Positions that reduce to the same slot are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    low: usize,
    high: usize,
    group_size: usize,
    offset: usize,
}

impl Default for Swap {
    fn default() -> Self {
        Self { low: 1, high: 3, group_size: 4, offset: 0 }
    }
}

impl Swap {
    pub fn new(x_position: i64, y_position: i64, group_size: i64, offset: i64) -> Result<Self, ConstructionError> {
        if x_position < 1 || y_position < 1 {
            return Err(ConstructionError::NonPositivePosition { x: x_position, y: y_position });
        }
        if x_position == y_position {
            return Err(ConstructionError::EqualPositions(x_position));
        }
        if group_size < 1 {
            return Err(ConstructionError::NonPositiveGroupSize(group_size));
        }
        if offset < 0 {
            return Err(ConstructionError::NegativeOffset(offset));
        }

        let group_size = group_size as usize;
        let x = (x_position as usize - 1) % group_size;
        let y = (y_position as usize - 1) % group_size;
        if x == y {
            return Err(ConstructionError::EqualPositions(x as i64 + 1));
        }

        Ok(Self { low: x.min(y), high: x.max(y), group_size, offset: offset as usize })
    }

    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new(
            "swap",
            "Swap",
            "Swap two beats, X and Y, in every group of beats. \
             X = 2, Y = 4, Group = 4 swaps beats 2 and 4 of every measure. X and Y must differ.",
        )
        .param(
            ParamSchema::integer("x_position", "X", "First beat to swap, starting at 1.")
                .minimum(1)
                .default_value(2),
        )
        .param(
            ParamSchema::integer("y_position", "Y", "Second beat to swap, starting at 1 and not equal to X.")
                .minimum(1)
                .default_value(4),
        )
        .param(
            ParamSchema::integer("group_size", "Group", "Beats per group, or how many beats to wait before swapping again.")
                .minimum(1)
                .default_value(4),
        )
        .param(
            ParamSchema::integer("offset", "Offset", "How many beats to wait before the first group.")
                .minimum(0)
                .default_value(0),
        )
    }

    pub(crate) fn construct(params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self::new(
            params.int("x_position")?,
            params.int("y_position")?,
            params.int("group_size")?,
            params.int("offset")?,
        )?
        .into())
    }

    fn swap_group(&self, mut group: Vec<Beat>) -> Vec<Beat> {
        if group.len() > self.high {
            group.swap(self.low, self.high);
        }
        group
    }
}

impl BeatEffect for Swap {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn apply<'a>(&'a self, beats: BeatStream<'a>) -> BeatStream<'a> {
        Box::new(Regroup::new(beats, self.offset, self.group_size, move |group| self.swap_group(group)))
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("x_position".into(), Value::from(self.low + 1));
        params.insert("y_position".into(), Value::from(self.high + 1));
        params.insert("group_size".into(), Value::from(self.group_size));
        params.insert("offset".into(), Value::from(self.offset));
        params
    }
}
