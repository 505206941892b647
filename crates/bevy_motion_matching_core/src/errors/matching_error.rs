use bevy::prelude::*;
use thiserror::Error;

use crate::features::ContactMovementMode;

/// Configuration and validation failures surfaced before (or instead of) a search.
///
/// None of these describe a "nothing matched" outcome: that is reported through
/// [`NewClipInfoToPlay::NOT_FOUND`](crate::query::NewClipInfoToPlay::NOT_FOUND).
#[non_exhaustive]
#[derive(Debug, Error, Reflect, Clone, PartialEq)]
pub enum MatchingError {
    #[error("query has {found} bones but the database stores {expected} bones per frame")]
    BoneCountMismatch { expected: usize, found: usize },
    #[error(
        "query trajectory has {found} points but the database stores {expected} points per frame"
    )]
    TrajectoryLengthMismatch { expected: usize, found: usize },
    #[error(
        "contact mode {mode:?} with {middle_contacts} middle contacts needs {expected} contacts, got {found}"
    )]
    ContactStrideMismatch {
        mode: ContactMovementMode,
        middle_contacts: usize,
        expected: usize,
        found: usize,
    },
    #[error("contact slot {slot} is out of range for {stride} contacts per frame")]
    ContactSlotOutOfRange { slot: usize, stride: usize },
    #[error("non-finite value in {0}")]
    NonFinite(String),
    #[error("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: String, value: f32 },
    #[error("blend weights sum to {0}, cannot normalize")]
    DegenerateBlendWeights(f32),
    #[error("clip index {index} is out of range ({count} clips)")]
    ClipIndexOutOfRange { index: usize, count: usize },
    #[error("expected one entry per clip ({expected}), got {found}")]
    ClipTableMismatch { expected: usize, found: usize },
    #[error("frame {frame} goes back in time within clip {clip}")]
    NonMonotonicLocalTime { clip: usize, frame: usize },
    #[error("clip {clip} has an empty or inverted time window [{start}, {end}]")]
    InvalidTimeWindow { clip: usize, start: f32, end: f32 },
    #[error("frame {frame} has {found} {what}, expected {expected}")]
    InconsistentFrameLayout {
        frame: usize,
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("at most {max} sections are supported, tried to declare {found}")]
    TooManySections { max: usize, found: usize },
    #[error("section index {index} does not fit in a mask of {max} sections")]
    SectionIndexOutOfRange { index: usize, max: usize },
    #[error("cost of frame {frame_index} is not finite")]
    NonFiniteCost { frame_index: usize },
    #[error("unknown section `{0}`")]
    UnknownSection(String),
    #[error("duplicate section `{0}`")]
    DuplicateSection(String),
    #[error("unknown motion state `{0}`")]
    UnknownMotionState(String),
    #[error("the frame database asset is not loaded")]
    DatabaseMissing,
}

pub type MatchingResult<T> = Result<T, MatchingError>;
