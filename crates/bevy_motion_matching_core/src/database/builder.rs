use bevy::{log::debug, platform::collections::HashMap};

use super::{ClipInfo, FrameData, FrameDatabase, FrameInfo};
use crate::{
    errors::{MatchingError, MatchingResult},
    sections::{MAX_SECTIONS, MotionState, SectionInfo, SectionTable},
    settings::check_weight,
    utils::weights::normalize_weights,
};

/// Write phase of a [`FrameDatabase`].
///
/// Frames are validated and flattened into the arena as they are pushed. Nothing can be appended
/// once [`Self::build`] has produced the immutable database.
#[derive(Debug, Default)]
pub struct FrameDatabaseBuilder {
    database: FrameDatabase,
    last_time_per_clip: Vec<Option<f32>>,
}

impl FrameDatabaseBuilder {
    pub fn new(trajectory_offsets: Vec<f32>, bone_count: usize) -> Self {
        Self {
            database: FrameDatabase {
                trajectory_offsets,
                bone_count,
                ..Default::default()
            },
            last_time_per_clip: Vec::new(),
        }
    }

    pub fn with_sections(mut self, sections: SectionTable) -> Self {
        self.database.sections = sections;
        self
    }

    /// Number of contacts every pushed frame must carry.
    pub fn with_contact_stride(mut self, contact_stride: usize) -> Self {
        self.database.contact_stride = contact_stride;
        self
    }

    pub fn sections(&self) -> &SectionTable {
        &self.database.sections
    }

    /// Registers a clip and returns its index.
    pub fn add_clip(&mut self, mut clip: ClipInfo) -> MatchingResult<usize> {
        let index = self.database.clips.len();
        if !clip.length.is_finite() || clip.length < 0. {
            return Err(MatchingError::NonFinite(format!("length of clip `{}`", clip.name)));
        }
        if !clip.window.is_valid() {
            return Err(MatchingError::InvalidTimeWindow {
                clip: index,
                start: clip.window.start,
                end: clip.window.end,
            });
        }
        if !clip.blend_weights.is_empty() {
            normalize_weights(&mut clip.blend_weights)?;
        }
        clip.frame_count = 0;

        self.database.clips.push(clip);
        self.last_time_per_clip.push(None);
        Ok(index)
    }

    pub fn add_state(&mut self, name: impl Into<String>, state: MotionState) {
        self.database.states.insert(name.into(), state);
    }

    /// Validates a frame, appends it to the arena and returns its index.
    ///
    /// The incoming `index` is ignored: frames are numbered densely in push order. Every frame
    /// is made a member of [`SectionTable::ALWAYS`].
    pub fn push_frame(&mut self, frame: FrameData) -> MatchingResult<usize> {
        let index = self.database.frames.len();
        let clip_count = self.database.clips.len();

        if frame.clip_index >= clip_count {
            return Err(MatchingError::ClipIndexOutOfRange {
                index: frame.clip_index,
                count: clip_count,
            });
        }
        check_len(index, "bones", self.database.bone_count, frame.pose.len())?;
        check_len(
            index,
            "trajectory points",
            self.database.trajectory_offsets.len(),
            frame.trajectory.len(),
        )?;
        check_len(
            index,
            "contacts",
            self.database.contact_stride,
            frame.contacts.len(),
        )?;

        if !frame.local_time.is_finite()
            || !frame.pose.is_finite()
            || !frame.trajectory.is_finite()
            || !frame.contacts.iter().all(|c| c.is_finite())
        {
            return Err(MatchingError::NonFinite(format!("frame {index}")));
        }

        let last_time = &mut self.last_time_per_clip[frame.clip_index];
        if last_time.is_some_and(|last| frame.local_time < last) {
            return Err(MatchingError::NonMonotonicLocalTime {
                clip: frame.clip_index,
                frame: index,
            });
        }
        *last_time = Some(frame.local_time);

        let declared = self.database.sections.len();
        if declared < MAX_SECTIONS && frame.sections.bits() >> declared != 0 {
            return Err(MatchingError::UnknownSection(format!(
                "bit set {:#x} on frame {index}",
                frame.sections.bits()
            )));
        }

        self.database.frames.push(FrameInfo {
            clip_index: frame.clip_index,
            local_time: frame.local_time,
            sections: frame.sections.with(SectionTable::ALWAYS_INDEX)?,
        });
        self.database.bones.extend(frame.pose.bones);
        self.database
            .trajectory_points
            .extend(frame.trajectory.points);
        self.database.contacts.extend(frame.contacts);
        self.database.clips[frame.clip_index].frame_count += 1;

        Ok(index)
    }

    /// Freezes the arena.
    ///
    /// Motion states with an empty `clip_sections` table require [`SectionTable::ALWAYS`] for
    /// every clip.
    pub fn build(mut self) -> MatchingResult<FrameDatabase> {
        let clip_count = self.database.clips.len();
        let section_count = self.database.sections.len() as i32;

        let mut states = HashMap::default();
        for (name, mut state) in self.database.states.drain() {
            if state.clip_sections.is_empty() {
                state.clip_sections = vec![SectionTable::ALWAYS_INDEX as i32; clip_count];
            } else if state.clip_sections.len() != clip_count {
                return Err(MatchingError::ClipTableMismatch {
                    expected: clip_count,
                    found: state.clip_sections.len(),
                });
            }
            validate_section_weights(&state.section_weights, section_count)?;
            if let Some(bad) = state.clip_sections.iter().find(|&&i| i >= section_count) {
                return Err(MatchingError::UnknownSection(format!("index {bad}")));
            }
            states.insert(name, state);
        }
        self.database.states = states;

        debug!(
            "Built frame database: {} frames, {} clips, {} bones, {} trajectory points, {} contacts per frame",
            self.database.frames.len(),
            clip_count,
            self.database.bone_count,
            self.database.trajectory_offsets.len(),
            self.database.contact_stride,
        );

        Ok(self.database)
    }
}

fn check_len(frame: usize, what: &str, expected: usize, found: usize) -> MatchingResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(MatchingError::InconsistentFrameLayout {
            frame,
            what: what.to_string(),
            expected,
            found,
        })
    }
}

pub(crate) fn validate_section_weights(
    infos: &[SectionInfo],
    section_count: i32,
) -> MatchingResult<()> {
    for info in infos {
        if info.index >= section_count {
            return Err(MatchingError::UnknownSection(format!("index {}", info.index)));
        }
        check_weight("section weight", info.weight)?;
    }
    Ok(())
}
