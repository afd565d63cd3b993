//! Beat effects
//!
//! Effects are lazy adaptors over a stream of beats. Periodic and grouped
//! effects pull at most one beat or one group at a time. Global reorders
//! (`randomize`, `reverseb`) have to buffer the whole song first and report
//! [`Materialization::Full`].

mod cut;
mod grouping;
mod periodic;
mod randomize;
mod remap;
mod remove;
mod repeat;
mod reverse;
mod reverse_all;
mod silence;
mod swap;

pub use cut::Cut;
pub use grouping::Regroup;
pub use periodic::{Periodic, PeriodicEffect};
pub use randomize::Randomize;
pub use remap::Remap;
pub use remove::Remove;
pub use repeat::Repeat;
pub use reverse::Reverse;
pub use reverse_all::ReverseAll;
pub use silence::Silence;
pub use swap::Swap;

use serde_json::{Map, Value};

use crate::beat::Beat;
use crate::registry::EffectRegistry;

/// A single-pass, finite stream of beats.
pub type BeatStream<'a> = Box<dyn Iterator<Item = Beat> + 'a>;

/// How much of the song an effect holds in memory while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialization {
    /// One beat or one group at a time.
    Streaming,
    /// Every beat of the song.
    Full,
}

/// Trait for beat effects
pub trait BeatEffect {
    /// Registry name, also the `type` key of a definition.
    fn name(&self) -> &'static str;
    fn materialization(&self) -> Materialization {
        Materialization::Streaming
    }
    fn apply<'a>(&'a self, beats: BeatStream<'a>) -> BeatStream<'a>;
    /// Parameters as they would appear in a definition.
    fn params(&self) -> Map<String, Value>;
}

/// Implements `From<$ty> for Effect` for every built-in variant.
macro_rules! effect_variants {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// Enum wrapper for all built-in effects
        #[derive(Debug, Clone, PartialEq)]
        pub enum Effect {
            $($variant($ty),)*
        }

        impl Effect {
            fn inner(&self) -> &dyn BeatEffect {
                match self {
                    $(Self::$variant(fx) => fx,)*
                }
            }
        }

        $(
            impl From<$ty> for Effect {
                fn from(fx: $ty) -> Self {
                    Self::$variant(fx)
                }
            }
        )*
    };
}

effect_variants! {
    Silence(Silence),
    Remove(Remove),
    Cut(Cut),
    Reverse(Reverse),
    Repeat(Repeat),
    Swap(Swap),
    Remap(Remap),
    Randomize(Randomize),
    ReverseAll(ReverseAll),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        self.inner().name()
    }

    pub fn materialization(&self) -> Materialization {
        self.inner().materialization()
    }

    pub fn apply<'a>(&'a self, beats: BeatStream<'a>) -> BeatStream<'a> {
        self.inner().apply(beats)
    }

    /// A definition that loads back into an equal effect.
    pub fn definition(&self) -> Value {
        let mut definition = Map::new();
        definition.insert("type".into(), Value::from(self.name()));
        definition.extend(self.inner().params());
        Value::Object(definition)
    }

    /// The self-valid example definition for this effect's type.
    pub fn schema_example(&self) -> Option<Value> {
        EffectRegistry::global().schema_for(self.name()).map(|schema| schema.example())
    }
}

/// Buffers the whole upstream before `reorder` runs. Nothing is pulled
/// until the first beat is requested.
pub(crate) fn materialize<'a, F>(beats: BeatStream<'a>, reorder: F) -> BeatStream<'a>
where
    F: FnOnce(&mut Vec<Beat>) + 'a,
{
    Box::new(
        std::iter::once_with(move || {
            let mut all: Vec<Beat> = beats.collect();
            tracing::debug!(beats = all.len(), "materialized song for global reorder");
            reorder(&mut all);
            all
        })
        .flatten(),
    )
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::beat::Beat;

    use super::{BeatStream, Effect};

    /// Mono beats of length 4, each filled with its value.
    pub fn constant_beats(values: &[f32]) -> Vec<Beat> {
        values.iter().map(|v| Beat::mono(vec![*v; 4])).collect()
    }

    /// Mono beats of length 1.
    pub fn single_sample_beats(values: &[f32]) -> Vec<Beat> {
        values.iter().map(|v| Beat::mono(vec![*v])).collect()
    }

    pub fn run(effect: &Effect, beats: Vec<Beat>) -> Vec<Beat> {
        let stream: BeatStream<'_> = Box::new(beats.into_iter());
        effect.apply(stream).collect()
    }

    /// First sample of every beat.
    pub fn heads(beats: &[Beat]) -> Vec<f32> {
        beats.iter().map(|b| b.samples()[0]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn test_materialization_flags() {
        assert_eq!(Effect::from(Silence::default()).materialization(), Materialization::Streaming);
        assert_eq!(Effect::from(Swap::default()).materialization(), Materialization::Streaming);
        assert_eq!(Effect::from(ReverseAll).materialization(), Materialization::Full);
        assert_eq!(Effect::from(Randomize::seeded(1)).materialization(), Materialization::Full);
    }

    #[test]
    fn test_materialize_is_lazy() {
        use std::cell::Cell;

        let pulled = Cell::new(0);
        let source = single_sample_beats(&[1.0, 2.0, 3.0]).into_iter().inspect(|_| pulled.set(pulled.get() + 1));
        let stream = materialize(Box::new(source), |beats| beats.reverse());
        assert_eq!(pulled.get(), 0);
        let out: Vec<Beat> = stream.collect();
        assert_eq!(pulled.get(), 3);
        assert_eq!(heads(&out), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_definition_includes_type() {
        let def = Effect::from(Repeat::new(2, 0, 3).unwrap()).definition();
        assert_eq!(def, serde_json::json!({"type": "repeat", "period": 2, "offset": 0, "times": 3}));
    }
}
