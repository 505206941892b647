//! # Bevy Motion Matching
//!
//! **Bevy Motion Matching** selects the next animation frame to play by searching a database of
//! pre-sampled frames for the one whose pose and trajectory best match the character's current
//! pose and desired path, instead of walking a hand-authored state machine.
//!
//! ## Introduction
//!
//! A [`FrameDatabase`] is produced offline by sampling animation clips and is loaded from a
//! `*.mmdb.ron` file. Each frame stores, per tracked bone, a local position and velocity, a
//! trajectory sampled at fixed time offsets, a set of sections (tags like "crouch" or
//! "left turn") and, optionally, contact points. A minimal database looks like:
//! ```ron
//! (
//!     trajectory_offsets: [-0.2, 0.2, 0.4],
//!     bone_count: 2,
//!     sections: ["Crouch"],
//!     clips: [(name: "walk", length: 1.2, looping: true)],
//!     states: [(name: "locomotion", section_weights: [(section: "Crouch", weight: 4.0)])],
//!     frames: [ /* (clip: 0, time: 0.0, pose: [...], trajectory: [...]) */ ],
//! )
//! ```
//!
//! Searches take a fresh query every tick. There are four strategies:
//! - [`basic_search`]: whole motion group, with section filtering/weighting and self-match
//!   suppression.
//! - [`single_clip_search`]: standalone playback, restricted to each clip's permitted time
//!   window.
//! - [`contact_enter_search`]: adds a contact cost so the result continues toward given contact
//!   points (ledges, footstep targets...).
//! - [`impact_search`]: pose plus a single contact, for reactive events.
//!
//! Each returns a [`NewClipInfoToPlay`]. A `clip_index` of `-1` means nothing matched and the
//! current animation should be kept.
//!
//! ## ECS usage
//!
//! Add [`MotionMatchingPlugin`], attach a [`MotionMatcher`] to the entity driving a motion group
//! and, every tick, report the currently playing clip and submit a [`SearchRequest`]:
//! ```ignore
//!     matcher
//!         .set_current_clip(Some(CurrentPlayedClipInfo::new(clip, group, time)))
//!         .request(SearchRequest::Basic(query));
//!     // ... after MotionMatchingSet has run:
//!     if let Some(next) = matcher.take_clip_to_play() {
//!         // seek/crossfade to next.clip_index at next.local_time
//!     }
//! ```
//! The matcher only hands out a result when it differs from what is already playing by more than
//! `max_clip_delta_time`.
//!
//! [`FrameDatabase`]: bevy_motion_matching_core::database::FrameDatabase
//! [`basic_search`]: bevy_motion_matching_core::search::basic_search
//! [`single_clip_search`]: bevy_motion_matching_core::search::single_clip_search
//! [`contact_enter_search`]: bevy_motion_matching_core::search::contact_enter_search
//! [`impact_search`]: bevy_motion_matching_core::search::impact_search
//! [`NewClipInfoToPlay`]: bevy_motion_matching_core::query::NewClipInfoToPlay
//! [`SearchRequest`]: bevy_motion_matching_core::query::SearchRequest
//! [`MotionMatchingPlugin`]: plugin::MotionMatchingPlugin
//! [`MotionMatcher`]: matcher::MotionMatcher

pub mod matcher;
pub mod plugin;
pub mod systems;

pub use bevy_motion_matching_core as core;

pub mod prelude {
    pub use super::core::cost::*;
    pub use super::core::database::{
        ClipInfo, FrameData, FrameDatabase, FrameDatabaseBuilder, TimeWindow,
    };
    pub use super::core::errors::*;
    pub use super::core::features::*;
    pub use super::core::hysteresis::{is_same_location, should_switch};
    pub use super::core::query::*;
    pub use super::core::search::*;
    pub use super::core::sections::*;
    pub use super::core::settings::MotionMatchingSettings;
    pub use super::matcher::*;
    pub use super::plugin::*;
}
