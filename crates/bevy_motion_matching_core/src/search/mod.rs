//! Data-parallel nearest-frame searches over a [`FrameDatabase`].
//!
//! Every strategy validates its query up front, then runs one linear scan where each frame is
//! either filtered out or assigned a cost. The scan keeps the first frame with the strictly
//! lowest cost, so ties always go to the lowest frame index, serial or parallel. A cost that
//! overflows to infinity or NaN fails the search with [`MatchingError::NonFiniteCost`] instead of
//! being ranked.

mod basic;
mod contact;
mod impact;
mod single_clip;

use std::borrow::Cow;

use bevy::{
    log::{debug, trace},
    tasks::{ComputeTaskPool, ParallelSlice, TaskPool},
};

pub use basic::basic_search;
pub use contact::{contact_enter_search, enter_contact_cost};
pub use impact::impact_search;
pub use single_clip::single_clip_search;

use crate::{
    database::{FrameDatabase, FrameInfo, TimeWindow},
    errors::{MatchingError, MatchingResult},
    features::{PoseData, Trajectory},
    query::{NewClipInfoToPlay, SearchRequest},
    settings::MotionMatchingSettings,
};

/// Runs whichever search the request names.
pub fn search(
    database: &FrameDatabase,
    request: &SearchRequest,
    settings: &MotionMatchingSettings,
) -> MatchingResult<NewClipInfoToPlay> {
    match request {
        SearchRequest::Basic(query) => basic_search(database, query, settings),
        SearchRequest::SingleClip(query) => single_clip_search(database, query, settings),
        SearchRequest::ContactEnter(query) => contact_enter_search(database, query, settings),
        SearchRequest::Impact(query) => impact_search(database, query, settings),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Candidate {
    pub frame_index: usize,
    pub cost: f32,
}

#[inline]
fn keep_best(best: Option<Candidate>, candidate: Candidate) -> Option<Candidate> {
    match best {
        Some(best) if candidate.cost >= best.cost => Some(best),
        _ => Some(candidate),
    }
}

/// Scan of a contiguous run of frames. Stops at the first frame whose cost is not finite.
fn scan_range<F>(
    frames: &[FrameInfo],
    offset: usize,
    evaluate: &F,
) -> MatchingResult<Option<Candidate>>
where
    F: Fn(usize, &FrameInfo) -> Option<f32>,
{
    frames
        .iter()
        .enumerate()
        .try_fold(None, |best, (i, frame)| {
            let frame_index = offset + i;
            match evaluate(frame_index, frame) {
                None => Ok(best),
                Some(cost) if !cost.is_finite() => {
                    Err(MatchingError::NonFiniteCost { frame_index })
                }
                Some(cost) => Ok(keep_best(best, Candidate { frame_index, cost })),
            }
        })
}

/// Lowest-cost frame according to `evaluate`, which returns `None` for filtered frames.
///
/// Large databases are split into chunks scanned on the [`ComputeTaskPool`]. Chunk results come
/// back in chunk order and are merged with the same strict comparison as within a chunk, so both
/// the winner and the first non-finite frame reported are those of a serial scan.
pub(crate) fn scan<F>(
    database: &FrameDatabase,
    settings: &MotionMatchingSettings,
    evaluate: F,
) -> MatchingResult<Option<Candidate>>
where
    F: Fn(usize, &FrameInfo) -> Option<f32> + Send + Sync,
{
    let frames = database.frames();
    let chunk_size = settings.effective_chunk_size(frames.len());

    if chunk_size >= frames.len() {
        return scan_range(frames, 0, &evaluate);
    }

    let pool = ComputeTaskPool::get_or_init(TaskPool::default);
    frames
        .par_chunk_map(pool, chunk_size, |chunk_index, chunk| {
            scan_range(chunk, chunk_index * chunk_size, &evaluate)
        })
        .into_iter()
        .try_fold(None, |best, chunk| -> MatchingResult<_> {
            Ok(match chunk? {
                Some(candidate) => keep_best(best, candidate),
                None => best,
            })
        })
}

pub(crate) fn into_result(
    database: &FrameDatabase,
    group_index: i32,
    candidate: Option<Candidate>,
    strategy: &str,
) -> NewClipInfoToPlay {
    let Some(Candidate { frame_index, cost }) = candidate else {
        debug!(
            "{strategy} search in group {group_index}: all {} frames were filtered out",
            database.frame_count()
        );
        return NewClipInfoToPlay::not_found(group_index);
    };

    let frame = database.frame(frame_index);
    trace!(
        "{strategy} search in group {group_index}: frame {frame_index} (clip {}, t={}) cost {cost}",
        frame.clip_index, frame.local_time
    );

    NewClipInfoToPlay {
        clip_index: frame.clip_index as i32,
        group_index,
        local_time: frame.local_time as f64,
        best_cost: cost,
    }
}

pub(crate) fn validate_pose(database: &FrameDatabase, pose: &PoseData) -> MatchingResult<()> {
    if pose.len() != database.bone_count() {
        return Err(MatchingError::BoneCountMismatch {
            expected: database.bone_count(),
            found: pose.len(),
        });
    }
    if !pose.is_finite() {
        return Err(MatchingError::NonFinite("query pose".into()));
    }
    Ok(())
}

pub(crate) fn validate_trajectory(
    database: &FrameDatabase,
    trajectory: &Trajectory,
) -> MatchingResult<()> {
    if trajectory.len() != database.trajectory_len() {
        return Err(MatchingError::TrajectoryLengthMismatch {
            expected: database.trajectory_len(),
            found: trajectory.len(),
        });
    }
    if !trajectory.is_finite() {
        return Err(MatchingError::NonFinite("query trajectory".into()));
    }
    Ok(())
}

/// The query's window overrides, or the database's own windows.
pub(crate) fn resolve_windows<'a>(
    database: &'a FrameDatabase,
    overrides: Option<&'a [TimeWindow]>,
) -> MatchingResult<Cow<'a, [TimeWindow]>> {
    let Some(windows) = overrides else {
        return Ok(Cow::Owned(database.clip_windows()));
    };
    if windows.len() != database.clips().len() {
        return Err(MatchingError::ClipTableMismatch {
            expected: database.clips().len(),
            found: windows.len(),
        });
    }
    if let Some((clip, window)) = windows.iter().enumerate().find(|(_, w)| !w.is_valid()) {
        return Err(MatchingError::InvalidTimeWindow {
            clip,
            start: window.start,
            end: window.end,
        });
    }
    Ok(Cow::Borrowed(windows))
}
