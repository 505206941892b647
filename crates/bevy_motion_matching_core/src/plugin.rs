use bevy::{
    app::{App, Plugin},
    asset::AssetApp,
};

use crate::{
    cost::{ContactCostMode, PoseCostMode, TrajectoryCostMode},
    database::{
        ClipInfo, FrameData, FrameDatabase, FrameInfo, TimeWindow, loader::FrameDatabaseLoader,
    },
    features::{
        BoneData, ContactMovementMode, FrameContact, PoseData, Trajectory, TrajectoryPoint,
    },
    query::{
        BasicQuery, ContactQuery, CurrentPlayedClipInfo, ImpactQuery, NewClipInfoToPlay,
        SearchRequest, SingleClipQuery,
    },
    sections::{MotionState, SectionInfo, SectionMask},
    settings::MotionMatchingSettings,
};

/// Registers the frame database asset, its loader and reflection data for the core types
#[derive(Default)]
pub struct MotionMatchingCorePlugin;

impl Plugin for MotionMatchingCorePlugin {
    fn build(&self, app: &mut App) {
        self.register_assets(app);
        self.register_types(app);
    }
}

impl MotionMatchingCorePlugin {
    fn register_assets(&self, app: &mut App) {
        app.init_asset::<FrameDatabase>()
            .init_asset_loader::<FrameDatabaseLoader>()
            .register_asset_reflect::<FrameDatabase>();
    }

    fn register_types(&self, app: &mut App) {
        app //
            .register_type::<BoneData>()
            .register_type::<PoseData>()
            .register_type::<TrajectoryPoint>()
            .register_type::<Trajectory>()
            .register_type::<FrameContact>()
            .register_type::<ContactMovementMode>()
            .register_type::<PoseCostMode>()
            .register_type::<TrajectoryCostMode>()
            .register_type::<ContactCostMode>()
            .register_type::<ClipInfo>()
            .register_type::<TimeWindow>()
            .register_type::<FrameInfo>()
            .register_type::<FrameData>()
            .register_type::<SectionMask>()
            .register_type::<SectionInfo>()
            .register_type::<MotionState>()
            .register_type::<CurrentPlayedClipInfo>()
            .register_type::<NewClipInfoToPlay>()
            .register_type::<BasicQuery>()
            .register_type::<SingleClipQuery>()
            .register_type::<ContactQuery>()
            .register_type::<ImpactQuery>()
            .register_type::<SearchRequest>()
            .register_type::<MotionMatchingSettings>();
    }
}
