//! The frame database: an immutable struct-of-arrays arena of every sampled frame.
//!
//! Per-frame data lives in [`FrameInfo`]s indexed by frame index. Per-bone, per-trajectory-point
//! and per-contact data live in flat buffers indexed by `frame_index * stride + sub_index`, so a
//! search is one linear pass over contiguous memory. The arena is only written by
//! [`FrameDatabaseBuilder`]; once built it is shared read-only between concurrent searches.

pub mod builder;
pub mod loader;

use bevy::{
    asset::Asset,
    platform::collections::HashMap,
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};

pub use builder::FrameDatabaseBuilder;

use crate::{
    errors::{MatchingError, MatchingResult},
    features::{BoneData, FrameContact, PoseData, Trajectory, TrajectoryPoint},
    sections::{MotionState, SectionMask, SectionTable},
};

/// Permitted local-time interval `[start, end]` of a clip.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f32,
    pub end: f32,
}

impl TimeWindow {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, time: f32) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start <= self.end
    }
}

/// Metadata of a source clip.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub name: String,
    /// Clip length in seconds.
    pub length: f32,
    pub looping: bool,
    /// Frames outside this window are never selected by window-filtered searches.
    pub window: TimeWindow,
    /// Normalized blend-tree weights, empty for plain clips.
    pub blend_weights: Vec<f32>,
    /// Number of frames sampled from this clip.
    pub frame_count: usize,
}

impl ClipInfo {
    /// A clip whose whole length is eligible.
    pub fn new(name: impl Into<String>, length: f32, looping: bool) -> Self {
        Self {
            name: name.into(),
            length,
            looping,
            window: TimeWindow::new(0., length),
            blend_weights: Vec::new(),
            frame_count: 0,
        }
    }

    pub fn with_window(mut self, start: f32, end: f32) -> Self {
        self.window = TimeWindow::new(start, end);
        self
    }

    pub fn with_blend_weights(mut self, weights: Vec<f32>) -> Self {
        self.blend_weights = weights;
        self
    }
}

/// The part of a frame read by every filter: source clip, time and section membership.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct FrameInfo {
    pub clip_index: usize,
    pub local_time: f32,
    pub sections: SectionMask,
}

/// One frame with all of its features, as delivered by the capture pipeline.
///
/// The database does not store these: [`FrameDatabaseBuilder::push_frame`] flattens them and
/// [`FrameDatabase::frame_data`] reassembles one on demand.
#[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct FrameData {
    pub index: usize,
    pub clip_index: usize,
    pub local_time: f32,
    pub trajectory: Trajectory,
    pub pose: PoseData,
    pub sections: SectionMask,
    pub contacts: Vec<FrameContact>,
}

#[derive(Asset, Reflect, Clone, Debug, Default)]
#[reflect(Default)]
pub struct FrameDatabase {
    pub(crate) clips: Vec<ClipInfo>,
    pub(crate) trajectory_offsets: Vec<f32>,
    pub(crate) bone_count: usize,
    pub(crate) contact_stride: usize,
    pub(crate) frames: Vec<FrameInfo>,
    pub(crate) trajectory_points: Vec<TrajectoryPoint>,
    pub(crate) bones: Vec<BoneData>,
    pub(crate) contacts: Vec<FrameContact>,
    #[reflect(ignore)]
    pub(crate) sections: SectionTable,
    pub(crate) states: HashMap<String, MotionState>,
}

impl FrameDatabase {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clips(&self) -> &[ClipInfo] {
        &self.clips
    }

    pub fn clip(&self, clip_index: usize) -> Option<&ClipInfo> {
        self.clips.get(clip_index)
    }

    /// Time offsets (seconds, negative for the past) of the trajectory points of every frame.
    pub fn trajectory_offsets(&self) -> &[f32] {
        &self.trajectory_offsets
    }

    pub fn trajectory_len(&self) -> usize {
        self.trajectory_offsets.len()
    }

    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    /// Number of contacts stored per frame.
    pub fn contact_stride(&self) -> usize {
        self.contact_stride
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    pub fn state(&self, name: &str) -> MatchingResult<&MotionState> {
        self.states
            .get(name)
            .ok_or_else(|| MatchingError::UnknownMotionState(name.to_string()))
    }

    pub fn frames(&self) -> &[FrameInfo] {
        &self.frames
    }

    #[inline]
    pub fn frame(&self, frame_index: usize) -> &FrameInfo {
        &self.frames[frame_index]
    }

    #[inline]
    pub fn pose(&self, frame_index: usize) -> &[BoneData] {
        let start = frame_index * self.bone_count;
        &self.bones[start..start + self.bone_count]
    }

    #[inline]
    pub fn trajectory(&self, frame_index: usize) -> &[TrajectoryPoint] {
        let stride = self.trajectory_offsets.len();
        let start = frame_index * stride;
        &self.trajectory_points[start..start + stride]
    }

    #[inline]
    pub fn contacts(&self, frame_index: usize) -> &[FrameContact] {
        let start = frame_index * self.contact_stride;
        &self.contacts[start..start + self.contact_stride]
    }

    /// Permitted time window of every clip, indexed by clip.
    pub fn clip_windows(&self) -> Vec<TimeWindow> {
        self.clips.iter().map(|clip| clip.window).collect()
    }

    /// Reassembles the full record of a frame, or `None` if the index is out of range.
    pub fn frame_data(&self, frame_index: usize) -> Option<FrameData> {
        let info = self.frames.get(frame_index)?;
        Some(FrameData {
            index: frame_index,
            clip_index: info.clip_index,
            local_time: info.local_time,
            trajectory: self.trajectory(frame_index).to_vec().into(),
            pose: self.pose(frame_index).to_vec().into(),
            sections: info.sections,
            contacts: self.contacts(frame_index).to_vec(),
        })
    }
}
