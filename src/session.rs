use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::client::{TrackerBackend, UploadBatch};
use crate::clock::MatchClock;
use crate::config::SessionConfig;
use crate::error::{ApiError, Result, TrackerError};
use crate::export;
use crate::model::{
    EventDraft, EventType, FieldBounds, Half, MatchEvent, PitchLocation, Player, Roster,
};
use crate::timer::MatchTimer;

/// State of one match being recorded: roster, clock, the event being
/// composed and the log of confirmed events awaiting upload.
pub struct EventSession<B> {
    backend: B,
    config: SessionConfig,
    roster: Roster,
    timer: MatchTimer,
    draft: EventDraft,
    log: Vec<MatchEvent>,
    uploading: bool,
}

impl<B: TrackerBackend> EventSession<B> {
    /// Create a session with empty rosters. Call [`EventSession::load_roster`]
    /// to populate them.
    pub fn new(backend: B, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            roster: Roster::default(),
            timer: MatchTimer::new(),
            draft: EventDraft::default(),
            log: Vec::new(),
            uploading: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    /// Confirmed events in the order they were recorded.
    pub fn log(&self) -> &[MatchEvent] {
        &self.log
    }

    /// Confirmed events, most recent first.
    pub fn recent_events(&self) -> impl Iterator<Item = &MatchEvent> {
        self.log.iter().rev()
    }

    /// Fetch the roster and keep the two configured teams.
    ///
    /// On failure the rosters are left empty and the session stays usable.
    #[instrument(skip(self), fields(home = self.config.home_team_id, away = self.config.away_team_id))]
    pub async fn load_roster(&mut self) -> Result<&Roster> {
        match self.backend.fetch_players().await {
            Ok(players) => {
                self.roster = Roster::from_players(
                    players,
                    self.config.home_team_id,
                    self.config.away_team_id,
                );
                info!(
                    home = self.roster.home.len(),
                    away = self.roster.away.len(),
                    "roster loaded"
                );
                Ok(&self.roster)
            }
            Err(e) => {
                warn!(error = %e, "roster fetch failed");
                self.roster = Roster::default();
                Err(TrackerError::RosterFetch(e))
            }
        }
    }

    // Clock

    pub fn clock(&self) -> MatchClock {
        self.timer.snapshot()
    }

    /// Start the match clock. Must be called from within a Tokio runtime.
    pub fn start_clock(&mut self) {
        self.timer.start();
    }

    pub fn pause_clock(&mut self) {
        self.timer.pause();
    }

    pub fn reset_clock(&mut self) {
        self.timer.reset();
    }

    pub fn set_half(&mut self, half: Half) {
        self.timer.set_half(half);
    }

    // Draft

    /// Record a click on the field surface. A new location restarts the event
    /// type choice.
    pub fn select_location(
        &mut self,
        client_x: f64,
        client_y: f64,
        bounds: FieldBounds,
    ) -> Result<PitchLocation> {
        let location = PitchLocation::from_click(client_x, client_y, bounds)?;
        self.place_location(location);
        Ok(location)
    }

    /// Same as [`EventSession::select_location`] for coordinates that are
    /// already normalized.
    pub fn place_location(&mut self, location: PitchLocation) {
        debug!(x = location.x, y = location.y, zone = %location.zone, "location selected");
        self.draft.location = Some(location);
        self.draft.event_type = None;
    }

    pub fn select_player(&mut self, player: Player) {
        debug!(player_id = player.id, "player selected");
        self.draft.player = Some(player);
    }

    /// Select a player from the loaded roster by id.
    pub fn select_player_by_id(&mut self, player_id: u32) -> Result<&Player> {
        let player = self
            .roster
            .find(player_id)
            .cloned()
            .ok_or(TrackerError::UnknownPlayer(player_id))?;
        debug!(player_id, "player selected");
        Ok(self.draft.player.insert(player))
    }

    pub fn select_event_type(&mut self, event_type: EventType) {
        self.draft.event_type = Some(event_type);
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.draft.description = text.into();
    }

    /// Whether the event type picker should be offered.
    pub fn event_picker_open(&self) -> bool {
        self.draft.player.is_some() && self.draft.location.is_some()
    }

    /// Turn the draft into a logged event stamped with the current clock.
    pub fn confirm_event(&mut self) -> Result<&MatchEvent> {
        let (Some(player), Some(location), Some(event_type)) = (
            self.draft.player.as_ref(),
            self.draft.location,
            self.draft.event_type,
        ) else {
            return Err(TrackerError::Validation {
                missing: self.draft.missing_fields(),
            });
        };

        let clock = self.timer.snapshot();
        let event = MatchEvent {
            match_id: self.config.match_id,
            player_id: player.id,
            player_name: player.full_name.clone(),
            team_id: player.team,
            event_type,
            is_opponent_event: player.team == self.config.away_team_id,
            minute: clock.minute(),
            second: clock.second(),
            half: clock.half(),
            location,
            phase: self.draft.phase,
            description: self.draft.description.clone(),
            timestamp: Utc::now(),
        };
        info!(
            event_type = %event.event_type,
            player_id = event.player_id,
            phase = event.phase,
            clock = %clock.display(),
            "event recorded"
        );

        self.log.push(event);
        self.draft.advance();
        Ok(&self.log[self.log.len() - 1])
    }

    // Export and upload

    /// Serialize the whole log to CSV without touching it.
    pub fn export_log(&self) -> Result<String> {
        export::to_csv(&self.log)
    }

    pub fn pending_count(&self) -> usize {
        self.log.len()
    }

    /// Text for the confirmation step shown before uploading.
    pub fn upload_prompt(&self) -> String {
        format!(
            "Are you sure you want to upload all {} events to the server? This cannot be undone.",
            self.log.len()
        )
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Serialize the log and mark an upload as in flight.
    ///
    /// Fails with [`TrackerError::UploadInFlight`] while a previous batch has
    /// not been finished.
    pub fn begin_upload(&mut self) -> Result<UploadBatch> {
        if self.uploading {
            return Err(TrackerError::UploadInFlight);
        }
        if self.log.is_empty() {
            return Err(TrackerError::EmptyLog);
        }
        let batch = UploadBatch {
            match_id: self.config.match_id,
            csv: self.export_log()?,
            count: self.log.len(),
        };
        self.uploading = true;
        Ok(batch)
    }

    /// Settle an upload started with [`EventSession::begin_upload`].
    ///
    /// On success the uploaded events are removed from the log and their
    /// count is returned. On failure the log is kept as it was.
    pub fn finish_upload(
        &mut self,
        batch: &UploadBatch,
        outcome: std::result::Result<(), ApiError>,
    ) -> Result<usize> {
        self.uploading = false;
        match outcome {
            Ok(()) => {
                let uploaded = batch.count.min(self.log.len());
                self.log.drain(..uploaded);
                info!(uploaded, remaining = self.log.len(), "log uploaded");
                Ok(uploaded)
            }
            Err(e) => {
                warn!(error = %e, pending = self.log.len(), "upload failed, log kept");
                Err(TrackerError::Upload(e))
            }
        }
    }

    /// Upload the log in one batch and clear it on success.
    ///
    /// Dropping the returned future before it completes releases the
    /// in-flight flag and leaves the log untouched.
    pub async fn submit_log(&mut self) -> Result<usize> {
        let batch = self.begin_upload()?;
        let outcome = {
            let _in_flight = InFlight(&mut self.uploading);
            self.backend.upload_events(&batch).await
        };
        self.finish_upload(&batch, outcome)
    }
}

/// Clears the upload flag when dropped.
struct InFlight<'a>(&'a mut bool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
