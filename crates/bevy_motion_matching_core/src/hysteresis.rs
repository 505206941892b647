//! Guard against re-triggering the moment that is already playing.

use crate::{
    database::FrameDatabase,
    query::{CurrentPlayedClipInfo, NewClipInfoToPlay},
};

/// Whether `winner` is effectively the frame `current` is already at.
///
/// A different clip or group is never the same location. Within the same clip, a looping clip
/// first checks the wrapped delta `current + clip_length - winner`, then every clip checks the
/// plain delta `|current - winner|`; either one within `max_clip_delta_time` counts as the same
/// location.
pub fn is_same_location(
    current: &CurrentPlayedClipInfo,
    winner: &NewClipInfoToPlay,
    clip_length: f32,
    looping: bool,
    max_clip_delta_time: f32,
) -> bool {
    if current.clip_index != winner.clip_index || current.group_index != winner.group_index {
        return false;
    }

    let max_delta = max_clip_delta_time as f64;

    if looping {
        let wrapped_delta = current.local_time + clip_length as f64 - winner.local_time;
        if wrapped_delta < max_delta {
            return true;
        }
    }

    (current.local_time - winner.local_time).abs() <= max_delta
}

/// Whether the playback layer should seek to `winner`.
///
/// Not-found results never warrant a switch. Nothing playing always does.
pub fn should_switch(
    database: &FrameDatabase,
    current: Option<&CurrentPlayedClipInfo>,
    winner: &NewClipInfoToPlay,
    max_clip_delta_time: f32,
) -> bool {
    if !winner.is_found() {
        return false;
    }
    let Some(current) = current else {
        return true;
    };
    let Some(clip) = usize::try_from(current.clip_index)
        .ok()
        .and_then(|index| database.clip(index))
    else {
        return true;
    };

    !is_same_location(current, winner, clip.length, clip.looping, max_clip_delta_time)
}
