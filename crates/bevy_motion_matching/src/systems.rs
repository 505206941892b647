use bevy::{asset::prelude::*, ecs::prelude::*, log::warn};
use bevy_motion_matching_core::{database::FrameDatabase, errors::MatchingError};

use crate::matcher::MotionMatcher;

/// Runs the pending search of every [`MotionMatcher`].
///
/// Matchers are independent of each other and only share read access to their databases, so
/// they are processed in parallel. A matcher whose database is not loaded yet keeps its request
/// for a later update.
pub fn update_motion_matchers(
    databases: Res<Assets<FrameDatabase>>,
    mut matchers: Query<(Entity, &mut MotionMatcher)>,
) {
    matchers.par_iter_mut().for_each(|(entity, mut matcher)| {
        if !matcher.has_pending_request() {
            return;
        }

        let had_error = matcher.error().is_some();

        let Some(database) = databases.get(matcher.database()) else {
            if !had_error {
                warn!("Motion matcher on {entity:?} is waiting for its frame database to load");
            }
            matcher.set_error(MatchingError::DatabaseMissing);
            return;
        };

        if let Err(error) = matcher.run(database) {
            if !had_error {
                warn!("Motion matching search on {entity:?} failed: {error}");
            }
        }
    });
}
