use crate::model::{EventType, PitchLocation, Player};

/// A draft field that has to be filled in before the event can be confirmed.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, strum_macros::Display)]
pub enum DraftField {
    #[strum(serialize = "player")]
    Player,
    #[strum(serialize = "field location")]
    Location,
    #[strum(serialize = "event type")]
    EventType,
}

/// The event currently being composed.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub player: Option<Player>,
    pub location: Option<PitchLocation>,
    pub event_type: Option<EventType>,
    pub description: String,
    /// Phase number the next confirmed event will carry.
    pub phase: u32,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            player: None,
            location: None,
            event_type: None,
            description: String::new(),
            phase: 1,
        }
    }
}

impl EventDraft {
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.player.is_none() {
            missing.push(DraftField::Player);
        }
        if self.location.is_none() {
            missing.push(DraftField::Location);
        }
        if self.event_type.is_none() {
            missing.push(DraftField::EventType);
        }
        missing
    }

    /// Reset for the next entry. The player stays selected.
    pub(crate) fn advance(&mut self) {
        self.location = None;
        self.event_type = None;
        self.description.clear();
        self.phase += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_draft_misses_everything() {
        let draft = EventDraft::default();
        assert_eq!(draft.phase, 1);
        assert_eq!(
            draft.missing_fields(),
            vec![DraftField::Player, DraftField::Location, DraftField::EventType]
        );
    }

    #[test]
    fn test_advance_keeps_player() {
        let mut draft = EventDraft {
            player: Some(Player {
                id: 3,
                full_name: "B. Jones".to_string(),
                jersey_number: 9,
                team: 5,
            }),
            location: Some(PitchLocation::new(60.0, 20.0).unwrap()),
            event_type: Some(EventType::Pass),
            description: "flat pass".to_string(),
            phase: 4,
        };
        draft.advance();

        assert_eq!(draft.player.as_ref().map(|p| p.id), Some(3));
        assert!(draft.location.is_none());
        assert!(draft.event_type.is_none());
        assert!(draft.description.is_empty());
        assert_eq!(draft.phase, 5);
        assert_eq!(
            draft.missing_fields(),
            vec![DraftField::Location, DraftField::EventType]
        );
    }
}
