use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    reflect::TypePath,
};
use serde::{Deserialize, Serialize};

use super::{ClipInfo, FrameData, FrameDatabase, FrameDatabaseBuilder, TimeWindow};
use crate::{
    errors::{AssetLoaderError, MatchingResult},
    features::{BoneData, FrameContact, TrajectoryPoint},
    sections::{MotionState, SectionInfo, SectionTable},
};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ClipSerial {
    pub name: String,
    pub length: f32,
    #[serde(default)]
    pub looping: bool,
    /// Defaults to the whole clip.
    #[serde(default)]
    pub window: Option<TimeWindow>,
    #[serde(default)]
    pub blend_weights: Vec<f32>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SectionWeightSerial {
    pub section: String,
    pub weight: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MotionStateSerial {
    pub name: String,
    #[serde(default)]
    pub section_weights: Vec<SectionWeightSerial>,
    /// Required section per clip, `None` for no requirement. Empty means
    /// [`SectionTable::ALWAYS`] for every clip.
    #[serde(default)]
    pub clip_sections: Vec<Option<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FrameSerial {
    pub clip: usize,
    pub time: f32,
    #[serde(default)]
    pub sections: Vec<String>,
    pub pose: Vec<BoneData>,
    pub trajectory: Vec<TrajectoryPoint>,
    #[serde(default)]
    pub contacts: Vec<FrameContact>,
}

/// On-disk form of a [`FrameDatabase`] (`*.mmdb.ron`), with sections referenced by name.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FrameDatabaseSerial {
    pub trajectory_offsets: Vec<f32>,
    pub bone_count: usize,
    #[serde(default)]
    pub contact_stride: usize,
    #[serde(default)]
    pub sections: Vec<String>,
    pub clips: Vec<ClipSerial>,
    #[serde(default)]
    pub states: Vec<MotionStateSerial>,
    pub frames: Vec<FrameSerial>,
}

impl FrameDatabaseSerial {
    pub fn into_database(self) -> MatchingResult<FrameDatabase> {
        let sections = SectionTable::new(self.sections)?;
        let mut builder = FrameDatabaseBuilder::new(self.trajectory_offsets, self.bone_count)
            .with_contact_stride(self.contact_stride)
            .with_sections(sections);

        for clip in self.clips {
            let mut info = ClipInfo::new(clip.name, clip.length, clip.looping)
                .with_blend_weights(clip.blend_weights);
            if let Some(window) = clip.window {
                info.window = window;
            }
            builder.add_clip(info)?;
        }

        for state in self.states {
            let table = builder.sections();
            let section_weights = state
                .section_weights
                .iter()
                .map(|w| table.section_info(&w.section, w.weight))
                .collect::<MatchingResult<Vec<_>>>()?;
            let clip_sections = state
                .clip_sections
                .iter()
                .map(|section| match section {
                    Some(name) => Ok(table.index_of(name)? as i32),
                    None => Ok(SectionInfo::UNASSIGNED),
                })
                .collect::<MatchingResult<Vec<_>>>()?;
            builder.add_state(
                state.name,
                MotionState {
                    section_weights,
                    clip_sections,
                },
            );
        }

        for frame in self.frames {
            let sections = builder
                .sections()
                .mask_of(frame.sections.iter().map(String::as_str))?;
            builder.push_frame(FrameData {
                index: 0,
                clip_index: frame.clip,
                local_time: frame.time,
                trajectory: frame.trajectory.into(),
                pose: frame.pose.into(),
                sections,
                contacts: frame.contacts,
            })?;
        }

        builder.build()
    }
}

#[derive(Default, TypePath)]
pub struct FrameDatabaseLoader;

impl AssetLoader for FrameDatabaseLoader {
    type Asset = FrameDatabase;
    type Settings = ();
    type Error = AssetLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes).await?;
        let serial: FrameDatabaseSerial = ron::de::from_bytes(&bytes)?;
        Ok(serial.into_database()?)
    }

    fn extensions(&self) -> &[&str] {
        &["mmdb.ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATABASE: &str = r#"(
        trajectory_offsets: [-0.2, 0.2],
        bone_count: 1,
        sections: ["Crouch"],
        clips: [
            (name: "walk", length: 1.0, looping: true),
            (name: "crouch", length: 2.0, window: Some((start: 0.5, end: 1.5))),
        ],
        states: [
            (
                name: "locomotion",
                section_weights: [(section: "Crouch", weight: 2.0)],
                clip_sections: [None, Some("Crouch")],
            ),
        ],
        frames: [
            (
                clip: 0,
                time: 0.0,
                pose: [(position: (0.0, 1.0, 0.0), velocity: (0.0, 0.0, 1.0))],
                trajectory: [
                    (position: (0.0, 0.0, -0.2), velocity: (0.0, 0.0, 1.0), orientation: (0.0, 0.0, 1.0)),
                    (position: (0.0, 0.0, 0.2), velocity: (0.0, 0.0, 1.0), orientation: (0.0, 0.0, 0.0)),
                ],
            ),
            (
                clip: 1,
                time: 0.5,
                sections: ["Crouch"],
                pose: [(position: (0.0, 0.5, 0.0), velocity: (0.0, 0.0, 0.0))],
                trajectory: [
                    (position: (0.0, 0.0, 0.0), velocity: (0.0, 0.0, 0.0), orientation: (0.0, 0.0, 0.0)),
                    (position: (0.0, 0.0, 0.0), velocity: (0.0, 0.0, 0.0), orientation: (0.0, 0.0, 0.0)),
                ],
            ),
        ],
    )"#;

    #[test]
    fn loads_database_from_ron() {
        let serial: FrameDatabaseSerial = ron::de::from_str(DATABASE).unwrap();
        let db = serial.into_database().unwrap();

        assert_eq!(db.frame_count(), 2);
        assert_eq!(db.trajectory_len(), 2);
        assert_eq!(db.clip(1).unwrap().window, TimeWindow::new(0.5, 1.5));
        assert_eq!(db.clip(0).unwrap().window, TimeWindow::new(0., 1.));
        assert!(db.frame(1).sections.contains(1));
        assert!(!db.frame(0).sections.contains(1));

        let state = db.state("locomotion").unwrap();
        assert_eq!(state.section_weights, vec![SectionInfo::new(1, 2.)]);
        assert_eq!(state.clip_sections, vec![SectionInfo::UNASSIGNED, 1]);
    }

    #[test]
    fn unknown_section_names_fail_to_load() {
        let serial: FrameDatabaseSerial =
            ron::de::from_str(&DATABASE.replace(r#"sections: ["Crouch"],"#, "")).unwrap();
        assert!(serial.into_database().is_err());
    }
}
