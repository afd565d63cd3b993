//! Error types for beatmachine

use thiserror::Error;

/// A malformed effect definition. Raised by the registry before any effect
/// is constructed or any audio is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("effect definition must be a JSON object")]
    NotAnObject,
    #[error("effect chain must be a JSON array")]
    NotAnArray,
    #[error("effect definition missing `type` key")]
    MissingType,
    #[error("effect `type` must be a string")]
    InvalidTypeKey,
    #[error("unknown effect `{0}`")]
    UnknownEffect(String),
    #[error("effect `{effect}` has no parameter `{param}`")]
    UnknownParameter { effect: String, param: String },
    #[error("effect `{effect}` requires parameter `{param}`")]
    MissingParameter { effect: String, param: String },
    #[error("parameter `{param}` of `{effect}` must be {expected}")]
    WrongType {
        effect: String,
        param: String,
        expected: &'static str,
    },
    #[error("parameter `{param}` of `{effect}` must be >= {minimum}, but was {value}")]
    BelowMinimum {
        effect: String,
        param: String,
        minimum: i64,
        value: i64,
    },
}

/// Schema-valid parameters that break an effect's own invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("effect period must be > 0, but was {0}")]
    NonPositivePeriod(i64),
    #[error("offset must be >= 0, but was {0}")]
    NegativeOffset(i64),
    #[error("`remove` effect period must be >= 2, but was {0}")]
    RemovePeriodTooSmall(i64),
    #[error("`cut` denominator must be >= 2, but was {0}")]
    DenominatorTooSmall(i64),
    #[error("`cut` take_index must be within [0, {denominator}), but was {take_index}")]
    TakeIndexOutOfRange { take_index: i64, denominator: i64 },
    #[error("`repeat` effect must have `times` >= 2, but was {0}")]
    TooFewRepeats(i64),
    #[error("`swap` positions must both be >= 1, but were {x} and {y}")]
    NonPositivePosition { x: i64, y: i64 },
    #[error("`swap` positions must be distinct, but both were {0}")]
    EqualPositions(i64),
    #[error("group size must be > 0, but was {0}")]
    NonPositiveGroupSize(i64),
    #[error("`remap` mapping must not be empty")]
    EmptyMapping,
    #[error("`remap` values must be within [0, {len}), but got {value}")]
    MappingOutOfRange { value: i64, len: usize },
    #[error("`randomize` seed must be >= 0, but was {0}")]
    NegativeSeed(i64),
    #[error("no value for parameter `{0}`")]
    MissingValue(String),
}

/// Which stage of the pipeline an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Definition,
    Construction,
    Application,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error("invalid parameters for `{effect}`: {source}")]
    Construction {
        effect: String,
        #[source]
        source: ConstructionError,
    },
    #[error("effect #{index} ({effect}): {source}")]
    Chain {
        index: usize,
        effect: String,
        #[source]
        source: Box<Error>,
    },
    #[error("beat {index} has {found} channels, expected {expected}")]
    ChannelMismatch { index: usize, expected: u16, found: u16 },
    #[error("invalid beat boundaries: {0}")]
    InvalidBoundaries(String),
    #[error("invalid beat locator: {0}")]
    InvalidLocator(String),
    #[error("effect `{0}` is already registered with a different definition")]
    DuplicateEffect(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Definition(_) | Self::Json(_) => ErrorKind::Definition,
            Self::Construction { .. } => ErrorKind::Construction,
            Self::Chain { source, .. } => source.kind(),
            Self::DuplicateEffect(_) => ErrorKind::Definition,
            Self::ChannelMismatch { .. } | Self::InvalidBoundaries(_) | Self::InvalidLocator(_) => {
                ErrorKind::Application
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
