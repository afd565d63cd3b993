//! Cut: keep one equal slice of each selected beat

use serde_json::{Map, Value};

use crate::beat::Beat;
use crate::error::ConstructionError;
use crate::schema::{EffectSchema, ParamSchema, Params};

use super::periodic::impl_periodic_effect;
use super::{Effect, Periodic, PeriodicEffect};

#[derive(Debug, Clone, PartialEq)]
pub struct Cut {
    periodic: Periodic,
    denominator: usize,
    take_index: usize,
}

impl Default for Cut {
    fn default() -> Self {
        Self { periodic: Periodic::default(), denominator: 2, take_index: 0 }
    }
}

impl Cut {
    pub fn new(period: i64, offset: i64, denominator: i64, take_index: i64) -> Result<Self, ConstructionError> {
        let periodic = Periodic::new(period, offset)?;
        if denominator < 2 {
            return Err(ConstructionError::DenominatorTooSmall(denominator));
        }
        if !(0..denominator).contains(&take_index) {
            return Err(ConstructionError::TakeIndexOutOfRange { take_index, denominator });
        }
        Ok(Self { periodic, denominator: denominator as usize, take_index: take_index as usize })
    }

    pub(crate) fn schema() -> EffectSchema {
        EffectSchema::new(
            "cut",
            "Cut",
            "Keep one piece of each beat. Denominator = 2, Take = 0 keeps the first half; \
             Denominator = 2, Take = 1 keeps the second half.",
        )
        .params(Periodic::schema(1))
        .param(
            ParamSchema::integer("denominator", "Denominator", "How many pieces to cut each beat into.")
                .minimum(2)
                .default_value(2),
        )
        .param(
            ParamSchema::integer("take_index", "Take", "Which piece, starting at 0, to keep.")
                .minimum(0)
                .default_value(0),
        )
    }

    pub(crate) fn construct(params: &Params) -> Result<Effect, ConstructionError> {
        Ok(Self::new(
            params.int("period")?,
            params.int("offset")?,
            params.int("denominator")?,
            params.int("take_index")?,
        )?
        .into())
    }
}

impl PeriodicEffect for Cut {
    fn periodic(&self) -> &Periodic {
        &self.periodic
    }

    fn process_beat(&self, beat: Beat) -> Option<Beat> {
        let size = beat.frames() / self.denominator;
        Some(beat.slice_frames(self.take_index * size, size))
    }

    fn extra_params(&self, params: &mut Map<String, Value>) {
        params.insert("denominator".into(), Value::from(self.denominator));
        params.insert("take_index".into(), Value::from(self.take_index));
    }
}

impl_periodic_effect!(Cut, "cut");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_util::*;

    fn pairs() -> Vec<Beat> {
        vec![
            Beat::mono(vec![1.0, -1.0]),
            Beat::mono(vec![2.0, -2.0]),
            Beat::mono(vec![3.0, -3.0]),
            Beat::mono(vec![4.0, -4.0]),
        ]
    }

    #[test]
    fn test_cut_halves() {
        let first = Effect::from(Cut::new(1, 0, 2, 0).unwrap());
        assert_eq!(heads(&run(&first, pairs())), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(run(&first, pairs()).iter().all(|b| b.frames() == 1));

        let second = Effect::from(Cut::new(1, 0, 2, 1).unwrap());
        assert_eq!(heads(&run(&second, pairs())), vec![-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn test_cut_thirds() {
        let beats = vec![
            Beat::mono(vec![1.0, 2.0, 3.0]),
            Beat::mono(vec![4.0, 5.0, 6.0]),
            Beat::mono(vec![7.0, 8.0, 9.0]),
        ];
        let first = Effect::from(Cut::new(1, 0, 3, 0).unwrap());
        assert_eq!(run(&first, beats.clone()), single_sample_beats(&[1.0, 4.0, 7.0]));
        let last = Effect::from(Cut::new(1, 0, 3, 2).unwrap());
        assert_eq!(run(&last, beats), single_sample_beats(&[3.0, 6.0, 9.0]));
    }

    #[test]
    fn test_cut_stereo_frames() {
        let effect = Effect::from(Cut::new(1, 0, 2, 1).unwrap());
        let out = run(&effect, vec![Beat::new(2, vec![1.0, -1.0, 2.0, -2.0])]);
        assert_eq!(out, vec![Beat::new(2, vec![2.0, -2.0])]);
    }

    #[test]
    fn test_take_index_must_fit() {
        assert_eq!(
            Cut::new(1, 0, 2, 2),
            Err(ConstructionError::TakeIndexOutOfRange { take_index: 2, denominator: 2 })
        );
        assert_eq!(Cut::new(1, 0, 0, 0), Err(ConstructionError::DenominatorTooSmall(0)));
        assert_eq!(Cut::new(1, 0, 1, 0), Err(ConstructionError::DenominatorTooSmall(1)));
        assert!(Cut::new(0, 0, 2, 0).is_err());
    }
}
