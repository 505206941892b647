use super::{into_result, scan, validate_pose};
use crate::{
    database::FrameDatabase,
    errors::{MatchingError, MatchingResult},
    query::{ImpactQuery, NewClipInfoToPlay},
    settings::MotionMatchingSettings,
};

/// Search for reactive events (hits, landings): pose plus one contact, nothing else.
///
/// Every frame is a candidate. The query contact is compared with the frame contact stored in
/// `contact_slot`.
pub fn impact_search(
    database: &FrameDatabase,
    query: &ImpactQuery,
    settings: &MotionMatchingSettings,
) -> MatchingResult<NewClipInfoToPlay> {
    settings.validate()?;
    validate_pose(database, &query.pose)?;
    if query.contact_slot >= database.contact_stride() {
        return Err(MatchingError::ContactSlotOutOfRange {
            slot: query.contact_slot,
            stride: database.contact_stride(),
        });
    }
    if !query.contact.is_finite() {
        return Err(MatchingError::NonFinite("query contact".into()));
    }

    let best = scan(database, settings, |frame_index, _| {
        let contact_cost = settings.contact_cost.contact_cost(
            &query.contact,
            &database.contacts(frame_index)[query.contact_slot],
        );
        let pose_cost = settings
            .pose_cost
            .pose_cost(&query.pose.bones, database.pose(frame_index));

        Some(settings.pose_weight * pose_cost + settings.contact_weight * contact_cost)
    })?;

    Ok(into_result(database, query.group_index, best, "Impact"))
}
