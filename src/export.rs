use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::model::{EventType, MatchEvent, Zone};

/// File name of the CSV part in the upload form.
pub const CSV_FILE_NAME: &str = "events.csv";

/// One CSV row. Field order is the column order of the upload contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_type: EventType,
    pub timestamp: String,
    pub x: f64,
    pub y: f64,
    pub zone: Zone,
    pub description: String,
    pub player_id: u32,
    pub team_id: u32,
    pub phase: u32,
    pub is_opponent_event: bool,
}

impl From<&MatchEvent> for EventRecord {
    fn from(event: &MatchEvent) -> Self {
        Self {
            event_type: event.event_type,
            timestamp: event
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            x: event.location.x,
            y: event.location.y,
            zone: event.location.zone,
            description: event.description.clone(),
            player_id: event.player_id,
            team_id: event.team_id,
            phase: event.phase,
            is_opponent_event: event.is_opponent_event,
        }
    }
}

/// Serialize events to CSV text with a header row, in log order.
pub fn to_csv(events: &[MatchEvent]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for event in events {
        writer.serialize(EventRecord::from(event))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    debug!(rows = events.len(), bytes = bytes.len(), "encoded events csv");
    Ok(String::from_utf8(bytes)?)
}

/// Parse CSV text produced by [`to_csv`] back into records.
pub fn read_records(csv_text: &str) -> Result<Vec<EventRecord>> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<EventRecord>, _>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{Half, PitchLocation};

    fn event(event_type: EventType, x: f64, phase: u32, description: &str) -> MatchEvent {
        MatchEvent {
            match_id: 1,
            player_id: 10,
            player_name: "A. Smith".to_string(),
            team_id: 4,
            event_type,
            is_opponent_event: false,
            minute: 2,
            second: 5,
            half: Half::First,
            location: PitchLocation::new(x, 40.5).unwrap(),
            phase,
            description: description.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 2, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_header_follows_column_contract() {
        let csv_text = to_csv(&[event(EventType::Tackle, 15.0, 1, "")]).unwrap();
        let header = csv_text.lines().next().unwrap();
        assert_eq!(
            header,
            "event_type,timestamp,x,y,zone,description,player_id,team_id,phase,is_opponent_event"
        );
        let row = csv_text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "tackle,2025-06-02T14:30:00.000Z,15.0,40.5,Own 22,,10,4,1,false"
        );
    }

    #[test]
    fn test_round_trip_keeps_order_and_fields() {
        let events = vec![
            event(EventType::Tackle, 15.0, 1, ""),
            event(EventType::KnockOn, 55.25, 2, "dropped, under pressure"),
            event(EventType::Restart22, 90.0, 3, "quoted \"kick\""),
        ];
        let records = read_records(&to_csv(&events).unwrap()).unwrap();

        assert_eq!(records.len(), 3);
        for (record, event) in records.iter().zip(&events) {
            assert_eq!(record, &EventRecord::from(event));
        }
        assert_eq!(records[1].zone, Zone::OpponentHalf);
        assert_eq!(records[1].description, "dropped, under pressure");
        assert_eq!(records[2].event_type, EventType::Restart22);
        assert_eq!(records[2].phase, 3);
    }

    #[test]
    fn test_empty_log_encodes_to_empty_text() {
        assert_eq!(to_csv(&[]).unwrap(), "");
        assert!(read_records("").unwrap().is_empty());
    }
}
