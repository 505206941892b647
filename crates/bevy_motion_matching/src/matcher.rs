use bevy::{asset::prelude::*, ecs::prelude::*, reflect::prelude::*};
use bevy_motion_matching_core::{
    database::FrameDatabase,
    errors::{MatchingError, MatchingResult},
    hysteresis::should_switch,
    query::{CurrentPlayedClipInfo, NewClipInfoToPlay, SearchRequest},
    search::search,
    settings::MotionMatchingSettings,
};

/// Runs motion matching searches for one motion group.
///
/// Every tick the playback layer reports what it is playing with
/// [`set_current_clip`](Self::set_current_clip), submits a fresh query with
/// [`request`](Self::request) and, after [`update_motion_matchers`](crate::systems::update_motion_matchers)
/// has run, asks for the frame to seek to with [`take_clip_to_play`](Self::take_clip_to_play).
#[derive(Component, Default, Reflect)]
#[reflect(Component)]
pub struct MotionMatcher {
    pub(crate) database: Handle<FrameDatabase>,
    pub(crate) settings: MotionMatchingSettings,
    pub(crate) pending: Option<SearchRequest>,
    pub(crate) current: Option<CurrentPlayedClipInfo>,
    pub(crate) last_result: Option<NewClipInfoToPlay>,
    pub(crate) to_play: Option<NewClipInfoToPlay>,
    /// Error produced by the last search attempt
    #[reflect(ignore)]
    pub(crate) error: Option<MatchingError>,
}

impl MotionMatcher {
    pub fn new(database: Handle<FrameDatabase>) -> Self {
        Self {
            database,
            ..Default::default()
        }
    }

    pub fn with_settings(mut self, settings: MotionMatchingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn database(&self) -> &Handle<FrameDatabase> {
        &self.database
    }

    pub fn settings(&self) -> &MotionMatchingSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut MotionMatchingSettings {
        &mut self.settings
    }

    /// Queues a search for the next update. A request that has not run yet is replaced.
    pub fn request(&mut self, request: SearchRequest) -> &mut Self {
        self.pending = Some(request);
        self
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// What the playback layer is playing, `None` if nothing is.
    pub fn set_current_clip(&mut self, current: Option<CurrentPlayedClipInfo>) -> &mut Self {
        self.current = current;
        self
    }

    pub fn current_clip(&self) -> Option<&CurrentPlayedClipInfo> {
        self.current.as_ref()
    }

    /// Raw result of the last successful search, including not-found results and results
    /// suppressed by the same-location check.
    pub fn last_result(&self) -> Option<&NewClipInfoToPlay> {
        self.last_result.as_ref()
    }

    /// The frame the playback layer should switch to, if the last search warrants a switch.
    pub fn take_clip_to_play(&mut self) -> Option<NewClipInfoToPlay> {
        self.to_play.take()
    }

    pub fn error(&self) -> Option<&MatchingError> {
        self.error.as_ref()
    }

    /// Runs the pending request, if any, against `database`.
    ///
    /// A winner is published for playback only when it is found and is not the location already
    /// playing. Otherwise any unconsumed earlier winner is dropped so the playback layer holds
    /// its current state.
    pub fn run(&mut self, database: &FrameDatabase) -> MatchingResult<()> {
        let Some(request) = self.pending.take() else {
            return Ok(());
        };

        match search(database, &request, &self.settings) {
            Ok(winner) => {
                self.error = None;
                self.last_result = Some(winner);
                self.to_play = should_switch(
                    database,
                    self.current.as_ref(),
                    &winner,
                    self.settings.max_clip_delta_time,
                )
                .then_some(winner);
                Ok(())
            }
            Err(error) => {
                self.error = Some(error.clone());
                self.to_play = None;
                Err(error)
            }
        }
    }

    pub(crate) fn set_error(&mut self, error: MatchingError) {
        self.error = Some(error);
    }
}
