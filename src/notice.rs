use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::TrackerError;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn event_recorded() -> Self {
        Self::success("Event recorded!")
    }

    pub fn upload_succeeded(count: usize) -> Self {
        Self::success(format!("CSV uploaded successfully! ({count} events)"))
    }
}

impl From<&TrackerError> for Notice {
    fn from(err: &TrackerError) -> Self {
        match err {
            TrackerError::Validation { .. } => Self::error("Select player, field, and event"),
            TrackerError::RosterFetch(_) => Self::error("Error fetching teams/players"),
            TrackerError::Upload(_) => Self::error("CSV upload failed. Check your connection."),
            TrackerError::UploadInFlight => Self::info("Upload already in progress"),
            TrackerError::EmptyLog => Self::info("No events recorded yet"),
            other => Self::error(other.to_string()),
        }
    }
}

/// Notices in the order they were raised, each dropped once it has been
/// shown for its time to live.
#[derive(Debug)]
pub struct NoticeBoard {
    notices: VecDeque<(Instant, Notice)>,
    ttl: Duration,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            notices: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.push_at(Instant::now(), notice);
    }

    pub fn push_at(&mut self, raised_at: Instant, notice: Notice) {
        self.notices.push_back((raised_at, notice));
    }

    /// Drop expired notices and return the ones still visible at `now`.
    pub fn active(&mut self, now: Instant) -> impl Iterator<Item = &Notice> {
        let ttl = self.ttl;
        self.notices
            .retain(|(raised_at, _)| now.saturating_duration_since(*raised_at) < ttl);
        self.notices.iter().map(|(_, notice)| notice)
    }

    pub fn dismiss_all(&mut self) {
        self.notices.clear();
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_notices_expire_after_ttl() {
        let start = Instant::now();
        let mut board = NoticeBoard::new();
        board.push_at(start, Notice::event_recorded());
        board.push_at(start + Duration::from_secs(3), Notice::info("second"));

        let visible: Vec<_> = board.active(start + Duration::from_secs(1)).collect();
        assert_eq!(visible.len(), 2);

        let visible: Vec<_> = board
            .active(start + Duration::from_millis(4500))
            .map(|n| n.message.clone())
            .collect();
        assert_eq!(visible, vec!["second".to_string()]);

        assert_eq!(board.active(start + Duration::from_secs(8)).count(), 0);
    }

    #[test]
    fn test_error_notices() {
        let notice = Notice::from(&TrackerError::Validation { missing: vec![] });
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Select player, field, and event");

        let upload = TrackerError::Upload(ApiError::UnexpectedStatus {
            url: "http://localhost/upload".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        });
        assert_eq!(
            Notice::from(&upload).message,
            "CSV upload failed. Check your connection."
        );
        assert_eq!(Notice::from(&TrackerError::EmptyLog).severity, Severity::Info);
    }

    #[test]
    fn test_dismiss_all() {
        let mut board = NoticeBoard::default();
        board.push(Notice::error("boom"));
        board.dismiss_all();
        assert_eq!(board.active(Instant::now()).count(), 0);
    }
}
