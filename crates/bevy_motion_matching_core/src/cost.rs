//! Cost primitives: non-negative dissimilarities between two instances of a feature.
//!
//! Every primitive is a sum of squared component differences, except trajectory orientation
//! which contributes the (unsquared) length of the difference between facing vectors. All of
//! them are zero only for identical inputs. Inputs are validated as finite before a search
//! starts, so none of these functions can return NaN.

use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use serde::{Deserialize, Serialize};

use crate::features::{BoneData, FrameContact, TrajectoryPoint};

/// Which components of each bone contribute to the pose cost.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[reflect(Default)]
pub enum PoseCostMode {
    Position,
    Velocity,
    #[default]
    PositionVelocity,
    /// Pose cost is always zero.
    None,
}

impl PoseCostMode {
    #[inline]
    pub fn bone_cost(self, query: &BoneData, frame: &BoneData) -> f32 {
        match self {
            PoseCostMode::Position => query.position.distance_squared(frame.position),
            PoseCostMode::Velocity => query.velocity.distance_squared(frame.velocity),
            PoseCostMode::PositionVelocity => {
                query.position.distance_squared(frame.position)
                    + query.velocity.distance_squared(frame.velocity)
            }
            PoseCostMode::None => 0.,
        }
    }

    /// Sum of [`Self::bone_cost`] over paired bones.
    #[inline]
    pub fn pose_cost(self, query: &[BoneData], frame: &[BoneData]) -> f32 {
        if self == PoseCostMode::None {
            return 0.;
        }
        query
            .iter()
            .zip(frame)
            .map(|(q, f)| self.bone_cost(q, f))
            .sum()
    }
}

#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[reflect(Default)]
pub enum TrajectoryCostMode {
    /// Position, velocity and facing of every point.
    #[default]
    PositionVelocityOrientation,
    /// Trajectory cost is always zero.
    None,
}

impl TrajectoryCostMode {
    #[inline]
    pub fn point_cost(self, query: &TrajectoryPoint, frame: &TrajectoryPoint) -> f32 {
        match self {
            TrajectoryCostMode::PositionVelocityOrientation => {
                query.position.distance_squared(frame.position)
                    + query.velocity.distance_squared(frame.velocity)
                    + query
                        .forward_or_default()
                        .distance(frame.forward_or_default())
            }
            TrajectoryCostMode::None => 0.,
        }
    }

    #[inline]
    pub fn trajectory_cost(self, query: &[TrajectoryPoint], frame: &[TrajectoryPoint]) -> f32 {
        if self == TrajectoryCostMode::None {
            return 0.;
        }
        query
            .iter()
            .zip(frame)
            .map(|(q, f)| self.point_cost(q, f))
            .sum()
    }
}

#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[reflect(Default)]
pub enum ContactCostMode {
    #[default]
    Position,
    NormalOrDirection,
    PositionAndNormalOrDirection,
    /// Contact cost is always zero.
    None,
}

impl ContactCostMode {
    #[inline]
    pub fn contact_cost(self, query: &FrameContact, frame: &FrameContact) -> f32 {
        match self {
            ContactCostMode::Position => query.position.distance_squared(frame.position),
            ContactCostMode::NormalOrDirection => query
                .normal_or_direction
                .distance_squared(frame.normal_or_direction),
            ContactCostMode::PositionAndNormalOrDirection => {
                query.position.distance_squared(frame.position)
                    + query
                        .normal_or_direction
                        .distance_squared(frame.normal_or_direction)
            }
            ContactCostMode::None => 0.,
        }
    }
}
