use super::{into_result, resolve_windows, scan, validate_pose, validate_trajectory};
use crate::{
    cost::ContactCostMode,
    database::FrameDatabase,
    errors::{MatchingError, MatchingResult},
    features::{ContactMovementMode, FrameContact},
    query::{ContactQuery, NewClipInfoToPlay},
    settings::MotionMatchingSettings,
};

/// Contact cost of one frame under a contact movement mode.
///
/// `query` and `frame` both hold `mode.stride(middle_contacts)` contacts. Slot `k` of the frame
/// is compared with slot `k` of the query; a landing contact is compared with the query's last
/// slot.
#[inline]
pub fn enter_contact_cost(
    mode: ContactMovementMode,
    middle_contacts: usize,
    cost: ContactCostMode,
    query: &[FrameContact],
    frame: &[FrameContact],
) -> f32 {
    debug_assert_eq!(query.len(), mode.stride(middle_contacts));
    debug_assert_eq!(frame.len(), query.len());

    if cost == ContactCostMode::None {
        return 0.;
    }

    let slot = |k: usize| cost.contact_cost(&query[k], &frame[k]);
    let land = || cost.contact_cost(&query[query.len() - 1], &frame[frame.len() - 1]);

    match mode {
        ContactMovementMode::StartContact => (0..=middle_contacts).map(slot).sum(),
        ContactMovementMode::ContactLand => (1..middle_contacts).map(slot).sum::<f32>() + land(),
        ContactMovementMode::StartContactLand => {
            (0..=middle_contacts).map(slot).sum::<f32>() + land()
        }
        ContactMovementMode::Contact => (1..middle_contacts).map(slot).sum(),
        ContactMovementMode::StartLand => slot(0) + land(),
    }
}

/// Search for the frame that best continues toward the query's contact points.
///
/// Cost is `contact_weight * contact + trajectory_weight * trajectory + pose_weight * pose`,
/// restricted to each clip's time window. No self-match suppression is applied.
pub fn contact_enter_search(
    database: &FrameDatabase,
    query: &ContactQuery,
    settings: &MotionMatchingSettings,
) -> MatchingResult<NewClipInfoToPlay> {
    settings.validate()?;
    validate_pose(database, &query.pose)?;
    validate_trajectory(database, &query.trajectory)?;
    validate_contacts(database, query)?;
    let windows = resolve_windows(database, query.time_windows.as_deref())?;

    let best = scan(database, settings, |frame_index, frame| {
        if !windows[frame.clip_index].contains(frame.local_time) {
            return None;
        }

        let contact_cost = enter_contact_cost(
            query.mode,
            query.middle_contacts,
            settings.contact_cost,
            &query.contacts,
            database.contacts(frame_index),
        );
        let trajectory_cost = settings
            .trajectory_cost
            .trajectory_cost(&query.trajectory.points, database.trajectory(frame_index));
        let pose_cost = settings
            .pose_cost
            .pose_cost(&query.pose.bones, database.pose(frame_index));

        Some(
            settings.contact_weight * contact_cost
                + settings.trajectory_weight * trajectory_cost
                + settings.pose_weight * pose_cost,
        )
    })?;

    Ok(into_result(database, query.group_index, best, "Contact enter"))
}

fn validate_contacts(database: &FrameDatabase, query: &ContactQuery) -> MatchingResult<()> {
    let expected = query.mode.stride(query.middle_contacts);
    let mismatch = |found| MatchingError::ContactStrideMismatch {
        mode: query.mode,
        middle_contacts: query.middle_contacts,
        expected,
        found,
    };

    if query.contacts.len() != expected {
        return Err(mismatch(query.contacts.len()));
    }
    if database.contact_stride() != expected {
        return Err(mismatch(database.contact_stride()));
    }
    if !query.contacts.iter().all(FrameContact::is_finite) {
        return Err(MatchingError::NonFinite("query contacts".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3;

    use super::*;
    use crate::{
        cost::{PoseCostMode, TrajectoryCostMode},
        database::TimeWindow,
        search::test_utils::*,
    };

    fn contacts(zs: &[f32]) -> Vec<FrameContact> {
        zs.iter()
            .map(|z| FrameContact::new(Vec3::new(0., 0., *z), Vec3::Y))
            .collect()
    }

    fn settings() -> MotionMatchingSettings {
        MotionMatchingSettings {
            pose_cost: PoseCostMode::None,
            trajectory_cost: TrajectoryCostMode::None,
            contact_cost: ContactCostMode::Position,
            ..Default::default()
        }
    }

    fn contact_db(stride: usize, frames: &[&[f32]]) -> FrameDatabase {
        let mut builder = builder(1).with_contact_stride(stride);
        for (i, zs) in frames.iter().enumerate() {
            builder
                .push_frame(with_contacts(frame(0, i as f32 * 0.1, 0.), zs))
                .unwrap();
        }
        builder.build().unwrap()
    }

    fn query(mode: ContactMovementMode, middle_contacts: usize, zs: &[f32]) -> ContactQuery {
        ContactQuery {
            group_index: 1,
            pose: pose_z(0.),
            trajectory: still_trajectory(),
            contacts: contacts(zs),
            mode,
            middle_contacts,
            time_windows: None,
        }
    }

    fn cost(mode: ContactMovementMode, middle: usize, q: &[f32], f: &[f32]) -> f32 {
        enter_contact_cost(
            mode,
            middle,
            ContactCostMode::Position,
            &contacts(q),
            &contacts(f),
        )
    }

    #[test]
    fn start_contact_sums_every_slot() {
        assert_eq!(
            cost(ContactMovementMode::StartContact, 2, &[0., 0., 0.], &[1., 2., 3.]),
            1. + 4. + 9.
        );
    }

    #[test]
    fn contact_land_skips_the_first_slot() {
        assert_eq!(
            cost(ContactMovementMode::ContactLand, 2, &[0., 0., 0.], &[1., 2., 3.]),
            4. + 9.
        );
    }

    #[test]
    fn start_contact_land_adds_the_landing_slot() {
        assert_eq!(
            cost(
                ContactMovementMode::StartContactLand,
                2,
                &[0., 0., 0., 0.],
                &[1., 2., 3., 4.]
            ),
            1. + 4. + 9. + 16.
        );
    }

    #[test]
    fn contact_only_uses_inner_middle_slots() {
        assert_eq!(
            cost(ContactMovementMode::Contact, 3, &[0., 0., 0.], &[1., 2., 3.]),
            4. + 9.
        );
        assert_eq!(cost(ContactMovementMode::Contact, 0, &[], &[]), 0.);
    }

    #[test]
    fn start_land_uses_first_and_last_slots() {
        assert_eq!(
            cost(ContactMovementMode::StartLand, 5, &[0., 0.], &[1., 2.]),
            1. + 4.
        );
    }

    #[test]
    fn picks_frame_closest_to_the_target_contacts() {
        let db = contact_db(2, &[&[0., 5.], &[0., 1.], &[3., 1.]]);

        let result = contact_enter_search(
            &db,
            &query(ContactMovementMode::StartLand, 0, &[0., 1.]),
            &settings(),
        )
        .unwrap();

        assert_eq!(result.group_index, 1);
        assert_eq!(result.local_time, db.frame(1).local_time as f64);
        assert_eq!(result.best_cost, 0.);
    }

    #[test]
    fn contact_weight_trades_off_against_pose() {
        let mut builder = builder(1).with_contact_stride(2);
        builder
            .push_frame(with_contacts(frame(0, 0., 0.), &[0., 2.]))
            .unwrap();
        builder
            .push_frame(with_contacts(frame(0, 0.1, 1.), &[0., 0.]))
            .unwrap();
        let db = builder.build().unwrap();

        let q = query(ContactMovementMode::StartLand, 0, &[0., 0.]);
        let pose_heavy = MotionMatchingSettings {
            pose_cost: PoseCostMode::Position,
            pose_weight: 10.,
            contact_weight: 1.,
            ..settings()
        };
        let contact_heavy = MotionMatchingSettings {
            pose_weight: 1.,
            contact_weight: 10.,
            ..pose_heavy.clone()
        };

        assert_eq!(
            contact_enter_search(&db, &q, &pose_heavy).unwrap().local_time,
            0.
        );
        assert_eq!(
            contact_enter_search(&db, &q, &contact_heavy)
                .unwrap()
                .local_time,
            db.frame(1).local_time as f64
        );
    }

    #[test]
    fn respects_time_windows() {
        let db = contact_db(2, &[&[0., 0.], &[0., 1.], &[0., 2.]]);
        let mut q = query(ContactMovementMode::StartLand, 0, &[0., 0.]);
        q.time_windows = Some(vec![TimeWindow::new(0.15, 1.)]);

        let result = contact_enter_search(&db, &q, &settings()).unwrap();

        assert_eq!(result.local_time, db.frame(2).local_time as f64);
        assert_eq!(result.best_cost, 4.);
    }

    #[test]
    fn overflowing_contact_cost_is_an_error() {
        let db = contact_db(2, &[&[0., 0.], &[0., 1e30]]);

        let result = contact_enter_search(
            &db,
            &query(ContactMovementMode::StartLand, 0, &[0., 0.]),
            &settings(),
        );

        assert_eq!(result, Err(MatchingError::NonFiniteCost { frame_index: 1 }));
    }

    #[test]
    fn repeated_parallel_searches_are_bit_identical() {
        let frames: Vec<Vec<f32>> = (0..200)
            .map(|i| vec![(i % 7) as f32 * 0.3, ((i * 13) % 17) as f32 * 0.1])
            .collect();
        let frames: Vec<&[f32]> = frames.iter().map(Vec::as_slice).collect();
        let db = contact_db(2, &frames);
        let settings = MotionMatchingSettings {
            pose_cost: PoseCostMode::Position,
            trajectory_cost: TrajectoryCostMode::PositionVelocityOrientation,
            chunk_size: 16,
            parallel_threshold: 0,
            ..settings()
        };
        let mut q = query(ContactMovementMode::StartLand, 0, &[0.65, 0.82]);
        q.time_windows = Some(vec![TimeWindow::new(0., 100.)]);

        let first = contact_enter_search(&db, &q, &settings).unwrap();
        assert!(first.is_found());
        for _ in 0..10 {
            let again = contact_enter_search(&db, &q, &settings).unwrap();
            assert_eq!(first.clip_index, again.clip_index);
            assert_eq!(first.local_time.to_bits(), again.local_time.to_bits());
            assert_eq!(first.best_cost.to_bits(), again.best_cost.to_bits());
        }

        let serial = MotionMatchingSettings {
            parallel_threshold: usize::MAX,
            ..settings
        };
        assert_eq!(contact_enter_search(&db, &q, &serial), Ok(first));
    }

    #[test]
    fn stride_mismatch_fails_fast() {
        let db = contact_db(2, &[&[0., 0.]]);

        let result = contact_enter_search(
            &db,
            &query(ContactMovementMode::StartContact, 2, &[0., 0.]),
            &settings(),
        );
        assert_eq!(
            result,
            Err(MatchingError::ContactStrideMismatch {
                mode: ContactMovementMode::StartContact,
                middle_contacts: 2,
                expected: 3,
                found: 2,
            })
        );

        let result = contact_enter_search(
            &db,
            &query(ContactMovementMode::StartContact, 2, &[0., 0., 0.]),
            &settings(),
        );
        assert!(matches!(
            result,
            Err(MatchingError::ContactStrideMismatch { found: 2, .. })
        ));
    }
}
