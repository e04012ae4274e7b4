use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::format_clock;
use crate::error::{Result, TrackerError};
use crate::model::PitchLocation;

/// The fixed set of rugby actions an event can be tagged with.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Advantage,
    BoxKick,
    Carry,
    Conversion,
    ConversionMissed,
    DefensiveLineBreak,
    DropGoal,
    ForwardPass,
    FreeKick,
    FoulPlay,
    GrubberKick,
    HighTackle,
    HoldingOn,
    InTouch,
    Injury,
    Interception,
    Kick,
    KickReturn,
    Kickoff,
    KnockOn,
    LineBreak,
    Lineout,
    LineoutLoss,
    LineoutWin,
    Maul,
    MissedTackle,
    NotReleasing,
    Offload,
    Offside,
    Pass,
    Penalty,
    PenaltyGoal,
    PenaltyMissed,
    RefereeCall,
    Restart,
    #[strum(serialize = "restart_22")]
    #[serde(rename = "restart_22")]
    Restart22,
    Ruck,
    Run,
    Scrum,
    ScrumLoss,
    ScrumWin,
    SinBin,
    Substitution,
    Tackle,
    Timeout,
    Try,
    TryAssist,
    Turnover,
    YellowCard,
    RedCard,
}

impl EventType {
    /// Parse a snake_case tag such as `knock_on`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        tag.trim()
            .parse()
            .map_err(|_| TrackerError::UnknownEventType(tag.to_string()))
    }

    /// Human readable label, e.g. `knock on`.
    pub fn label(&self) -> String {
        self.as_ref().replace('_', " ")
    }
}

/// Match segment indicator.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
pub enum Half {
    #[default]
    #[strum(serialize = "1H")]
    #[serde(rename = "1H")]
    First,
    #[strum(serialize = "2H")]
    #[serde(rename = "2H")]
    Second,
    #[strum(serialize = "ET")]
    #[serde(rename = "ET")]
    ExtraTime,
}

/// A confirmed event. Never mutated once it is in the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvent {
    pub match_id: u32,
    pub player_id: u32,
    pub player_name: String,
    pub team_id: u32,
    pub event_type: EventType,
    pub is_opponent_event: bool,
    pub minute: u32,
    pub second: u32,
    pub half: Half,
    pub location: PitchLocation,
    pub phase: u32,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl MatchEvent {
    /// One line of the running event feed, e.g.
    /// `[1H 2:05] knock on - A. Smith (Own 22)`.
    pub fn feed_line(&self) -> String {
        let player = if self.player_name.is_empty() {
            "Unknown"
        } else {
            &self.player_name
        };
        format!(
            "[{} {}] {} - {} ({})",
            self.half,
            format_clock(self.minute * 60 + self.second),
            self.event_type.label(),
            player,
            self.location.zone,
        )
    }
}
