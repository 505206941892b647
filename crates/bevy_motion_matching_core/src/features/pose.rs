use bevy::{math::Vec3, reflect::prelude::*};
use serde::{Deserialize, Serialize};

/// Pose sample of a single tracked bone, in the local space of the character root.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct BoneData {
    pub position: Vec3,
    /// Finite difference `(next - prev) / dt` taken at capture time.
    pub velocity: Vec3,
}

impl BoneData {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// Builds a bone sample from its neighbouring positions, as the capture pipeline does.
    pub fn from_neighbours(prev: Vec3, position: Vec3, next: Vec3, dt: f32) -> Self {
        Self {
            position,
            velocity: (next - prev) / dt,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// All tracked bones of a frame, ordered as the database bone mask.
#[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct PoseData {
    pub bones: Vec<BoneData>,
}

impl PoseData {
    pub fn new(bones: Vec<BoneData>) -> Self {
        Self { bones }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.bones.iter().all(BoneData::is_finite)
    }
}

impl From<Vec<BoneData>> for PoseData {
    fn from(bones: Vec<BoneData>) -> Self {
        Self { bones }
    }
}
