//! Live inputs of a search and its result.
//!
//! Queries are plain values built fresh by the caller every tick. Each one carries its own
//! `group_index`: nothing about the motion group is stored globally.

use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use serde::{Deserialize, Serialize};

use crate::{
    database::TimeWindow,
    features::{ContactMovementMode, FrameContact, PoseData, Trajectory},
    sections::{MotionState, SectionInfo},
};

/// What a motion group is playing right now.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct CurrentPlayedClipInfo {
    pub clip_index: i32,
    pub group_index: i32,
    pub local_time: f64,
    /// Keep searches in this group from picking frames of this clip.
    pub exclude_self: bool,
}

impl CurrentPlayedClipInfo {
    pub fn new(clip_index: i32, group_index: i32, local_time: f64) -> Self {
        Self {
            clip_index,
            group_index,
            local_time,
            exclude_self: false,
        }
    }

    pub fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }
}

/// Result of a search: the frame to seek to.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct NewClipInfoToPlay {
    /// `-1` when no frame survived filtering.
    pub clip_index: i32,
    pub group_index: i32,
    pub local_time: f64,
    /// Never negative, `+inf` when nothing was found.
    pub best_cost: f32,
}

impl Default for NewClipInfoToPlay {
    fn default() -> Self {
        Self::NOT_FOUND
    }
}

impl NewClipInfoToPlay {
    pub const NOT_FOUND: Self = Self {
        clip_index: -1,
        group_index: -1,
        local_time: 0.,
        best_cost: f32::INFINITY,
    };

    pub fn not_found(group_index: i32) -> Self {
        Self {
            group_index,
            ..Self::NOT_FOUND
        }
    }

    pub fn is_found(&self) -> bool {
        self.clip_index >= 0
    }
}

/// Input of [`basic_search`](crate::search::basic_search).
#[derive(Reflect, Clone, Debug, Default, PartialEq)]
#[reflect(Default)]
pub struct BasicQuery {
    pub group_index: i32,
    pub pose: PoseData,
    pub trajectory: Trajectory,
    pub section_weights: Vec<SectionInfo>,
    /// Required section per clip, negative for none.
    pub clip_sections: Vec<i32>,
    /// Every clip playing in the motion group, used for self-match suppression.
    pub played_clips: Vec<CurrentPlayedClipInfo>,
}

impl BasicQuery {
    /// Query using a motion state's section configuration.
    pub fn for_state(
        group_index: i32,
        state: &MotionState,
        pose: PoseData,
        trajectory: Trajectory,
    ) -> Self {
        Self {
            group_index,
            pose,
            trajectory,
            section_weights: state.section_weights.clone(),
            clip_sections: state.clip_sections.clone(),
            played_clips: Vec::new(),
        }
    }

    pub fn with_played_clips(mut self, played_clips: Vec<CurrentPlayedClipInfo>) -> Self {
        self.played_clips = played_clips;
        self
    }
}

/// Input of [`single_clip_search`](crate::search::single_clip_search).
#[derive(Reflect, Clone, Debug, Default, PartialEq)]
#[reflect(Default)]
pub struct SingleClipQuery {
    pub group_index: i32,
    pub pose: PoseData,
    pub trajectory: Trajectory,
    /// Per-clip windows overriding the database's.
    pub time_windows: Option<Vec<TimeWindow>>,
}

/// Input of [`contact_enter_search`](crate::search::contact_enter_search).
#[derive(Reflect, Clone, Debug, Default, PartialEq)]
#[reflect(Default)]
pub struct ContactQuery {
    pub group_index: i32,
    pub pose: PoseData,
    pub trajectory: Trajectory,
    /// Exactly `mode.stride(middle_contacts)` contacts.
    pub contacts: Vec<FrameContact>,
    pub mode: ContactMovementMode,
    pub middle_contacts: usize,
    pub time_windows: Option<Vec<TimeWindow>>,
}

/// Input of [`impact_search`](crate::search::impact_search).
#[derive(Reflect, Clone, Debug, Default, PartialEq)]
#[reflect(Default)]
pub struct ImpactQuery {
    pub group_index: i32,
    pub pose: PoseData,
    pub contact: FrameContact,
    /// Which of the frame's stored contacts the query contact is matched against.
    pub contact_slot: usize,
}

/// Any of the four searches, for callers that pick the strategy at runtime.
#[derive(Reflect, Clone, Debug, PartialEq)]
pub enum SearchRequest {
    Basic(BasicQuery),
    SingleClip(SingleClipQuery),
    ContactEnter(ContactQuery),
    Impact(ImpactQuery),
}

impl SearchRequest {
    pub fn group_index(&self) -> i32 {
        match self {
            SearchRequest::Basic(q) => q.group_index,
            SearchRequest::SingleClip(q) => q.group_index,
            SearchRequest::ContactEnter(q) => q.group_index,
            SearchRequest::Impact(q) => q.group_index,
        }
    }
}
