use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use serde::{Deserialize, Serialize};

use crate::{
    cost::{ContactCostMode, PoseCostMode, TrajectoryCostMode},
    errors::{MatchingError, MatchingResult},
};

/// Weights, cost modes and tuning knobs shared by every search strategy.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct MotionMatchingSettings {
    pub pose_weight: f32,
    pub trajectory_weight: f32,
    pub contact_weight: f32,
    pub pose_cost: PoseCostMode,
    pub trajectory_cost: TrajectoryCostMode,
    pub contact_cost: ContactCostMode,
    /// Largest time difference (seconds) at which a match in the playing clip is treated as the
    /// frame already playing.
    pub max_clip_delta_time: f32,
    /// Number of frames scanned per parallel task.
    pub chunk_size: usize,
    /// Databases with fewer frames than this are scanned on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for MotionMatchingSettings {
    fn default() -> Self {
        Self {
            pose_weight: 1.,
            trajectory_weight: 1.,
            contact_weight: 1.,
            pose_cost: PoseCostMode::default(),
            trajectory_cost: TrajectoryCostMode::default(),
            contact_cost: ContactCostMode::default(),
            max_clip_delta_time: 0.1,
            chunk_size: 256,
            parallel_threshold: 1024,
        }
    }
}

impl MotionMatchingSettings {
    pub fn validate(&self) -> MatchingResult<()> {
        check_weight("pose_weight", self.pose_weight)?;
        check_weight("trajectory_weight", self.trajectory_weight)?;
        check_weight("contact_weight", self.contact_weight)?;
        check_weight("max_clip_delta_time", self.max_clip_delta_time)?;
        Ok(())
    }

    /// Chunk size actually used for a database of `frame_count` frames.
    ///
    /// Returns `frame_count` (a single chunk) when the scan should stay serial.
    pub(crate) fn effective_chunk_size(&self, frame_count: usize) -> usize {
        if frame_count < self.parallel_threshold || self.chunk_size == 0 {
            frame_count.max(1)
        } else {
            self.chunk_size
        }
    }
}

pub(crate) fn check_weight(name: &str, value: f32) -> MatchingResult<()> {
    if value.is_finite() && value >= 0. {
        Ok(())
    } else {
        Err(MatchingError::InvalidWeight {
            name: name.to_string(),
            value,
        })
    }
}
