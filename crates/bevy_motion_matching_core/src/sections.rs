//! Section membership masks, per-section weights and the named section table.

use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::errors::{MatchingError, MatchingResult};

/// Maximum number of sections a database can declare, bounded by the width of [`SectionMask`].
pub const MAX_SECTIONS: usize = 64;

/// Bit set of the sections a frame belongs to.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(transparent)]
pub struct SectionMask(u64);

impl SectionMask {
    pub const EMPTY: Self = Self(0);

    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn with(mut self, index: usize) -> MatchingResult<Self> {
        self.insert(index)?;
        Ok(self)
    }

    /// Fails for indices that do not fit in the mask.
    pub fn insert(&mut self, index: usize) -> MatchingResult<()> {
        let bit = u32::try_from(index)
            .ok()
            .and_then(|shift| 1u64.checked_shl(shift))
            .ok_or(MatchingError::SectionIndexOutOfRange {
                index,
                max: MAX_SECTIONS,
            })?;
        self.0 |= bit;
        Ok(())
    }

    /// Negative or out of range indices are never contained.
    #[inline]
    pub fn contains(self, index: i32) -> bool {
        (0..MAX_SECTIONS as i32).contains(&index) && self.0 & (1 << index) != 0
    }
}

/// Weight applied to the cost of frames belonging to a section.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct SectionInfo {
    /// Target section, [`SectionInfo::UNASSIGNED`] for none.
    pub index: i32,
    pub weight: f32,
}

impl Default for SectionInfo {
    fn default() -> Self {
        Self {
            index: Self::UNASSIGNED,
            weight: 1.,
        }
    }
}

impl SectionInfo {
    pub const UNASSIGNED: i32 = -1;

    pub fn new(index: i32, weight: f32) -> Self {
        Self { index, weight }
    }

    pub fn is_assigned(&self) -> bool {
        self.index >= 0
    }
}

/// Product of the weights of every assigned section the frame belongs to.
///
/// A frame outside every configured section gets a multiplier of `1.0`.
#[inline]
pub fn section_weight(infos: &[SectionInfo], mask: SectionMask) -> f32 {
    infos
        .iter()
        .filter(|info| info.is_assigned() && mask.contains(info.index))
        .fold(1., |acc, info| acc * info.weight)
}

/// Ordered section names. Index 0 is always [`SectionTable::ALWAYS`], which every frame belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionTable {
    names: IndexSet<String>,
}

impl Default for SectionTable {
    fn default() -> Self {
        Self {
            names: IndexSet::from([Self::ALWAYS.to_string()]),
        }
    }
}

impl SectionTable {
    pub const ALWAYS: &'static str = "Always";
    pub const ALWAYS_INDEX: usize = 0;

    /// Declares the given sections after the implicit [`Self::ALWAYS`] section.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> MatchingResult<Self> {
        let mut table = Self::default();
        for name in names {
            table.declare(name.into())?;
        }
        Ok(table)
    }

    fn declare(&mut self, name: String) -> MatchingResult<usize> {
        if self.names.contains(&name) {
            return Err(MatchingError::DuplicateSection(name));
        }
        if self.names.len() >= MAX_SECTIONS {
            return Err(MatchingError::TooManySections {
                max: MAX_SECTIONS,
                found: self.names.len() + 1,
            });
        }
        Ok(self.names.insert_full(name).0)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> MatchingResult<usize> {
        self.names
            .get_index_of(name)
            .ok_or_else(|| MatchingError::UnknownSection(name.to_string()))
    }

    /// Mask with [`Self::ALWAYS`] plus every named section.
    pub fn mask_of<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> MatchingResult<SectionMask> {
        names
            .into_iter()
            .try_fold(SectionMask::EMPTY.with(Self::ALWAYS_INDEX)?, |mask, name| {
                mask.with(self.index_of(name)?)
            })
    }

    pub fn section_info(&self, name: &str, weight: f32) -> MatchingResult<SectionInfo> {
        Ok(SectionInfo::new(self.index_of(name)? as i32, weight))
    }
}

/// Section configuration of one motion state.
#[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct MotionState {
    /// Weights compounded into the cost of frames in each section.
    pub section_weights: Vec<SectionInfo>,
    /// Section a frame of each clip must belong to in order to be eligible, indexed by clip.
    /// Negative entries place no requirement on that clip.
    pub clip_sections: Vec<i32>,
}
