use super::{into_result, scan, validate_pose, validate_trajectory};
use crate::{
    database::{FrameDatabase, builder::validate_section_weights},
    errors::{MatchingError, MatchingResult},
    query::{BasicQuery, NewClipInfoToPlay},
    sections::section_weight,
    settings::MotionMatchingSettings,
};

/// Unconstrained search over a motion group's frames.
///
/// A frame is skipped when a clip playing in the same group asks to exclude itself and the frame
/// comes from that clip, or when the frame is not in the section its clip requires. Surviving
/// frames cost `section_weight * (pose_weight * pose + trajectory_weight * trajectory)`.
pub fn basic_search(
    database: &FrameDatabase,
    query: &BasicQuery,
    settings: &MotionMatchingSettings,
) -> MatchingResult<NewClipInfoToPlay> {
    settings.validate()?;
    validate_pose(database, &query.pose)?;
    validate_trajectory(database, &query.trajectory)?;
    validate_section_weights(&query.section_weights, database.sections().len() as i32)?;
    if query.clip_sections.len() != database.clips().len() {
        return Err(MatchingError::ClipTableMismatch {
            expected: database.clips().len(),
            found: query.clip_sections.len(),
        });
    }

    let excluded_clips: Vec<i32> = query
        .played_clips
        .iter()
        .filter(|played| played.exclude_self && played.group_index == query.group_index)
        .map(|played| played.clip_index)
        .collect();

    let best = scan(database, settings, |frame_index, frame| {
        if excluded_clips.contains(&(frame.clip_index as i32)) {
            return None;
        }

        let required = query.clip_sections[frame.clip_index];
        if required >= 0 && !frame.sections.contains(required) {
            return None;
        }

        let weight = section_weight(&query.section_weights, frame.sections);
        let trajectory_cost = settings
            .trajectory_cost
            .trajectory_cost(&query.trajectory.points, database.trajectory(frame_index));
        let pose_cost = settings
            .pose_cost
            .pose_cost(&query.pose.bones, database.pose(frame_index));

        Some(
            weight
                * (settings.pose_weight * pose_cost
                    + settings.trajectory_weight * trajectory_cost),
        )
    })?;

    Ok(into_result(database, query.group_index, best, "Basic"))
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3;

    use super::*;
    use crate::{
        cost::{PoseCostMode, TrajectoryCostMode},
        features::{BoneData, TrajectoryPoint},
        query::CurrentPlayedClipInfo,
        sections::{SectionInfo, SectionMask, SectionTable},
        search::test_utils::*,
    };

    fn settings() -> MotionMatchingSettings {
        MotionMatchingSettings {
            pose_cost: PoseCostMode::Position,
            trajectory_cost: TrajectoryCostMode::None,
            ..Default::default()
        }
    }

    fn query(z: f32, clips: usize) -> BasicQuery {
        BasicQuery {
            group_index: 0,
            pose: pose_z(z),
            trajectory: still_trajectory(),
            section_weights: vec![],
            clip_sections: vec![0; clips],
            played_clips: vec![],
        }
    }

    #[test]
    fn picks_closest_pose() {
        let db = database([frame(0, 0., 0.), frame(0, 0.1, 1.), frame(0, 0.2, 2.)], 1);

        let result = basic_search(&db, &query(0.9, 1), &settings()).unwrap();

        assert_eq!(result.clip_index, 0);
        assert_eq!(result.group_index, 0);
        assert_eq!(result.local_time, 0.1f32 as f64);
        assert!((result.best_cost - 0.01).abs() < 1e-5);
    }

    #[test]
    fn repeated_searches_are_bit_identical() {
        let db = database(
            (0..300).map(|i| frame(i % 3, (i / 3) as f32 * 0.01, i as f32 * 0.37)),
            3,
        );
        let settings = MotionMatchingSettings {
            chunk_size: 16,
            parallel_threshold: 0,
            ..MotionMatchingSettings::default()
        };
        let mut query = query(42.1, 3);
        query.trajectory = vec![TrajectoryPoint::new(Vec3::X, Vec3::Z, Vec3::ZERO)].into();

        let first = basic_search(&db, &query, &settings).unwrap();
        for _ in 0..10 {
            let again = basic_search(&db, &query, &settings).unwrap();
            assert_eq!(first.clip_index, again.clip_index);
            assert_eq!(first.local_time.to_bits(), again.local_time.to_bits());
            assert_eq!(first.best_cost.to_bits(), again.best_cost.to_bits());
        }
    }

    #[test]
    fn equal_costs_resolve_to_lowest_frame_index() {
        let db = database([frame(0, 0., 5.), frame(1, 0., 0.), frame(0, 0.1, 2.)], 2);

        let result = basic_search(&db, &query(1., 2), &settings()).unwrap();

        assert_eq!(result.clip_index, 1);
        assert_eq!(result.best_cost, 1.);
    }

    #[test]
    fn excluded_self_clip_is_never_returned() {
        let db = database([frame(0, 0., 1.), frame(1, 0., 5.)], 2);
        let query = query(1., 2).with_played_clips(vec![
            CurrentPlayedClipInfo::new(0, 0, 0.).excluding_self(),
        ]);

        let result = basic_search(&db, &query, &settings()).unwrap();

        assert_eq!(result.clip_index, 1);
    }

    #[test]
    fn self_exclusion_only_applies_within_the_same_group() {
        let db = database([frame(0, 0., 1.), frame(1, 0., 5.)], 2);
        let query = query(1., 2).with_played_clips(vec![
            CurrentPlayedClipInfo::new(0, 7, 0.).excluding_self(),
            CurrentPlayedClipInfo::new(0, 0, 0.),
        ]);

        let result = basic_search(&db, &query, &settings()).unwrap();

        assert_eq!(result.clip_index, 0);
    }

    #[test]
    fn frames_outside_their_clips_section_are_never_returned() {
        let mut builder = builder(2).with_sections(SectionTable::new(["Crouch"]).unwrap());
        builder.push_frame(frame(0, 0., 1.)).unwrap();
        builder
            .push_frame(tagged(frame(1, 0., 9.), SectionMask::from_bits(0b10)))
            .unwrap();
        let db = builder.build().unwrap();

        let mut query = query(1., 2);
        query.clip_sections = vec![1, 1];

        let result = basic_search(&db, &query, &settings()).unwrap();

        assert_eq!(result.clip_index, 1);
    }

    #[test]
    fn section_weights_multiply_the_cost() {
        let mut builder = builder(1).with_sections(SectionTable::new(["A", "B"]).unwrap());
        builder
            .push_frame(tagged(frame(0, 0., 2.), SectionMask::from_bits(0b110)))
            .unwrap();
        let db = builder.build().unwrap();

        let mut query = query(0., 1);
        query.section_weights = vec![
            SectionInfo::new(1, 0.5),
            SectionInfo::new(2, 3.),
            SectionInfo::new(SectionInfo::UNASSIGNED, 100.),
        ];

        let result = basic_search(&db, &query, &settings()).unwrap();

        assert_eq!(result.best_cost, 4. * 0.5 * 3.);
    }

    #[test]
    fn section_weights_can_flip_the_winner() {
        let mut builder = builder(1).with_sections(SectionTable::new(["Penalized"]).unwrap());
        builder
            .push_frame(tagged(frame(0, 0., 1.), SectionMask::from_bits(0b10)))
            .unwrap();
        builder.push_frame(frame(0, 0.1, 2.)).unwrap();
        let db = builder.build().unwrap();

        let mut query = query(0., 1);
        assert_eq!(
            basic_search(&db, &query, &settings()).unwrap().local_time,
            0.
        );

        query.section_weights = vec![SectionInfo::new(1, 10.)];
        assert_eq!(
            basic_search(&db, &query, &settings()).unwrap().local_time,
            0.1f32 as f64
        );
    }

    #[test]
    fn everything_filtered_reports_not_found() {
        let db = database([frame(0, 0., 1.)], 1);
        let query = query(1., 1).with_played_clips(vec![
            CurrentPlayedClipInfo::new(0, 0, 0.).excluding_self(),
        ]);

        let result = basic_search(&db, &query, &settings()).unwrap();

        assert!(!result.is_found());
        assert_eq!(result.clip_index, -1);
        assert_eq!(result.best_cost, f32::INFINITY);
    }

    #[test]
    fn overflowing_costs_are_errors() {
        let mut builder = builder(1).with_sections(SectionTable::new(["Ignored"]).unwrap());
        builder.push_frame(frame(0, 0., 0.)).unwrap();
        builder
            .push_frame(tagged(frame(0, 0.1, 1e30), SectionMask::from_bits(0b10)))
            .unwrap();
        builder.push_frame(frame(0, 0.2, 10.)).unwrap();
        let db = builder.build().unwrap();

        // inf * 0 would otherwise poison the minimum with NaN
        let mut weighted = query(0., 1);
        weighted.section_weights = vec![SectionInfo::new(1, 0.)];
        assert_eq!(
            basic_search(&db, &weighted, &settings()),
            Err(MatchingError::NonFiniteCost { frame_index: 1 })
        );

        let db = database([frame(0, 0., 1e30)], 1);
        assert_eq!(
            basic_search(&db, &query(0., 1), &settings()),
            Err(MatchingError::NonFiniteCost { frame_index: 0 })
        );
    }

    #[test]
    fn malformed_queries_fail_fast() {
        let db = database([frame(0, 0., 1.)], 1);

        let mut bad = query(1., 1);
        bad.pose.bones.push(BoneData::default());
        assert!(matches!(
            basic_search(&db, &bad, &settings()),
            Err(MatchingError::BoneCountMismatch { expected: 1, found: 2 })
        ));

        let bad = query(f32::INFINITY, 1);
        assert!(matches!(
            basic_search(&db, &bad, &settings()),
            Err(MatchingError::NonFinite(_))
        ));

        let bad = query(1., 2);
        assert!(matches!(
            basic_search(&db, &bad, &settings()),
            Err(MatchingError::ClipTableMismatch { .. })
        ));

        let mut bad = query(1., 1);
        bad.section_weights = vec![SectionInfo::new(0, -2.)];
        assert!(matches!(
            basic_search(&db, &bad, &settings()),
            Err(MatchingError::InvalidWeight { .. })
        ));
    }
}
