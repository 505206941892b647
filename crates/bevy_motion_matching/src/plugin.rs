use bevy::{
    app::{App, Plugin, Update},
    ecs::schedule::{IntoScheduleConfigs, SystemSet},
};
use bevy_motion_matching_core::plugin::MotionMatchingCorePlugin;

use crate::{matcher::MotionMatcher, systems::update_motion_matchers};

/// Adds motion matching to an app
#[derive(Default)]
pub struct MotionMatchingPlugin;

/// Playback systems consuming [`MotionMatcher::take_clip_to_play`] should run after this set.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, SystemSet)]
pub struct MotionMatchingSet;

impl Plugin for MotionMatchingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MotionMatchingCorePlugin)
            .register_type::<MotionMatcher>()
            .add_systems(Update, update_motion_matchers.in_set(MotionMatchingSet));
    }
}
