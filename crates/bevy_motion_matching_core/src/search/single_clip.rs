use super::{into_result, resolve_windows, scan, validate_pose, validate_trajectory};
use crate::{
    database::FrameDatabase,
    errors::MatchingResult,
    query::{NewClipInfoToPlay, SingleClipQuery},
    settings::MotionMatchingSettings,
};

/// Search for standalone playback: no sections and no self-match suppression, only each clip's
/// permitted time window.
pub fn single_clip_search(
    database: &FrameDatabase,
    query: &SingleClipQuery,
    settings: &MotionMatchingSettings,
) -> MatchingResult<NewClipInfoToPlay> {
    settings.validate()?;
    validate_pose(database, &query.pose)?;
    validate_trajectory(database, &query.trajectory)?;
    let windows = resolve_windows(database, query.time_windows.as_deref())?;

    let best = scan(database, settings, |frame_index, frame| {
        if !windows[frame.clip_index].contains(frame.local_time) {
            return None;
        }

        let trajectory_cost = settings
            .trajectory_cost
            .trajectory_cost(&query.trajectory.points, database.trajectory(frame_index));
        let pose_cost = settings
            .pose_cost
            .pose_cost(&query.pose.bones, database.pose(frame_index));

        Some(settings.trajectory_weight * trajectory_cost + settings.pose_weight * pose_cost)
    })?;

    Ok(into_result(database, query.group_index, best, "Single clip"))
}
