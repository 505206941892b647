use bevy::{math::Vec3, reflect::prelude::*};
use serde::{Deserialize, Serialize};

/// A contact constraint sample (foot plant, hand on ledge...) in frame-local space.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct FrameContact {
    pub position: Vec3,
    pub normal_or_direction: Vec3,
}

impl FrameContact {
    pub fn new(position: Vec3, normal_or_direction: Vec3) -> Self {
        Self {
            position,
            normal_or_direction,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.normal_or_direction.is_finite()
    }
}

/// How contact samples of a candidate frame line up with the query's contacts.
///
/// The variant fixes both the per-frame stride of the contact array and the set of slots that
/// contribute to the contact cost.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[reflect(Default)]
pub enum ContactMovementMode {
    /// Start contact followed by the middle contacts.
    #[default]
    StartContact,
    /// Middle contacts followed by a landing contact.
    ContactLand,
    /// Start contact, middle contacts and a landing contact.
    StartContactLand,
    /// Middle contacts only.
    Contact,
    /// Start and landing contacts, nothing in between.
    StartLand,
}

impl ContactMovementMode {
    /// Number of contacts stored per frame for this mode.
    pub fn stride(self, middle_contacts: usize) -> usize {
        match self {
            ContactMovementMode::StartContact | ContactMovementMode::ContactLand => {
                middle_contacts + 1
            }
            ContactMovementMode::StartContactLand => middle_contacts + 2,
            ContactMovementMode::Contact => middle_contacts,
            ContactMovementMode::StartLand => 2,
        }
    }

    /// Whether the last query slot is matched against the frame's landing contact.
    pub fn has_land(self) -> bool {
        matches!(
            self,
            ContactMovementMode::ContactLand
                | ContactMovementMode::StartContactLand
                | ContactMovementMode::StartLand
        )
    }
}
