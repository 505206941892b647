use bevy::{math::Vec3, reflect::prelude::*};
use serde::{Deserialize, Serialize};

/// One sample of a path at a fixed time offset from the owning frame.
///
/// All vectors live in the frame's local space.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct TrajectoryPoint {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Facing direction. A zero vector means "undefined", see [`Self::forward_or_default`].
    pub orientation: Vec3,
}

impl TrajectoryPoint {
    /// Forward axis used when a point carries no orientation of its own.
    pub const OBJECT_FORWARD: Vec3 = Vec3::Z;

    pub fn new(position: Vec3, velocity: Vec3, orientation: Vec3) -> Self {
        Self {
            position,
            velocity,
            orientation,
        }
    }

    pub fn forward_or_default(&self) -> Vec3 {
        if self.orientation == Vec3::ZERO {
            Self::OBJECT_FORWARD
        } else {
            self.orientation
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.orientation.is_finite()
    }
}

/// Trajectory points sampled at the database's configured offsets, in the same order.
#[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(TrajectoryPoint::is_finite)
    }
}

impl From<Vec<TrajectoryPoint>> for Trajectory {
    fn from(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }
}
