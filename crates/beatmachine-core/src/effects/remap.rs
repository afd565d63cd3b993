//! Remap: rebuild every group from a list of indices

use serde_json::{Map, Value, json};

use crate::beat::Beat;
use crate::error::ConstructionError;
use crate::schema::{EffectSchema, ParamSchema, Params};

use super::{BeatEffect, BeatStream, Effect, Regroup};

/// Groups are `mapping.len()` beats long. Each output group lists
/// `group[i]` for every `i` in `mapping` that exists in the group, which
/// allows duplicating, dropping and reordering beats. `[0, 3, 2, 1]` is
/// the same as swapping beats 2 and 4.
#[derive(Debug, Clone, PartialEq)]
pub struct Remap {
    mapping: Vec<usize>,
}

impl Remap {
    pub fn new(mapping: Vec<i64>) -> Result<Self, ConstructionError> {
        if mapping.is_empty() {
            return Err(ConstructionError::EmptyMapping);
        }
        let len = mapping.len();
        if let Some(&value) = mapping.iter().find(|m| **m < 0 || **m as usize >= len) {
            return Err(ConstructionError::MappingOutOfRange { value, len });
        }
        Ok(Self { mapping: mapping.into_iter().map(|m| m as usize).collect() })
    }

    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new(
            "remap",
            "Remap",
            "Rebuild every group of beats from a list of indices. [0, 3, 2, 1] swaps beats 2 and 4 \
             of every 4; [0, 1, 1, 1] replaces beats 3 and 4 with beat 2.",
        )
        .param(
            ParamSchema::integer_array(
                "mapping",
                "Mapping",
                "New order of beats, starting at 0. Every value must be smaller than the mapping's length.",
            )
            .example_value(json!([0, 3, 2, 1])),
        )
    }

    pub(crate) fn construct(params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self::new(params.int_list("mapping")?)?.into())
    }

    fn remap_group(&self, group: Vec<Beat>) -> Vec<Beat> {
        self.mapping.iter().filter_map(|&i| group.get(i).cloned()).collect()
    }
}

impl BeatEffect for Remap {
    fn name(&self) -> &'static str {
        "remap"
    }

    fn apply<'a>(&'a self, beats: BeatStream<'a>) -> BeatStream<'a> {
        Box::new(Regroup::new(beats, 0, self.mapping.len(), move |group| self.remap_group(group)))
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("mapping".into(), json!(self.mapping));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_util::*;

    fn remap(mapping: Vec<i64>) -> Effect {
        Remap::new(mapping).unwrap().into()
    }

    #[test]
    fn test_full_group_reversed() {
        let out = run(&remap(vec![3, 2, 1, 0]), single_sample_beats(&[5.0, 6.0, 7.0, 8.0]));
        assert_eq!(heads(&out), vec![8.0, 7.0, 6.0, 5.0]);
    }

    #[test]
    fn test_partial_group_skips_missing_indices() {
        let out = run(&remap(vec![3, 2, 1, 0]), single_sample_beats(&[5.0, 6.0]));
        assert_eq!(heads(&out), vec![6.0, 5.0]);
    }

    #[test]
    fn test_partial_group_in_order() {
        let out = run(&remap(vec![0, 1, 3, 2]), single_sample_beats(&[5.0, 6.0]));
        assert_eq!(heads(&out), vec![5.0, 6.0]);
    }

    #[test]
    fn test_duplicate_and_omit() {
        let out = run(&remap(vec![0, 1, 1, 1]), single_sample_beats(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]));
        assert_eq!(heads(&out), vec![1.0, 2.0, 2.0, 2.0, 5.0, 6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_same_as_swap() {
        let beats = single_sample_beats(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let swap = Effect::from(crate::effects::Swap::new(2, 4, 4, 0).unwrap());
        assert_eq!(run(&remap(vec![0, 3, 2, 1]), beats.clone()), run(&swap, beats));
    }

    #[test]
    fn test_out_of_range_mapping() {
        assert_eq!(Remap::new(vec![0, 4, 1, 2]), Err(ConstructionError::MappingOutOfRange { value: 4, len: 4 }));
        assert_eq!(Remap::new(vec![0, -1]), Err(ConstructionError::MappingOutOfRange { value: -1, len: 2 }));
        assert_eq!(Remap::new(Vec::new()), Err(ConstructionError::EmptyMapping));
    }
}
