use itertools::Itertools;

use crate::model::DraftField;

/// Failures talking to the roster or ingestion endpoints.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read or decode the response body.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A multipart part could not be built.
    #[error("invalid multipart part: {0}")]
    InvalidPart(reqwest::Error),
}

/// All errors surfaced by the tracker session.
///
/// None of them are fatal: the session stays usable after each one.
#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    /// Confirm was attempted with an incomplete draft.
    #[error("select player, field, and event (missing {})", .missing.iter().join(", "))]
    Validation { missing: Vec<DraftField> },

    /// A coordinate was NaN or infinite.
    #[error("coordinates must be finite numbers, got ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    /// The field surface has no area, so a click cannot be normalized.
    #[error("field bounds must have a positive width and height")]
    InvalidFieldBounds,

    /// The roster request failed; the session continues with empty rosters.
    #[error("error fetching teams/players: {0}")]
    RosterFetch(#[source] ApiError),

    /// The batch submission failed; the log is retained for a retry.
    #[error("csv upload failed: {0}")]
    Upload(#[source] ApiError),

    /// A submission is already outstanding.
    #[error("an upload is already in progress")]
    UploadInFlight,

    /// There is nothing in the log to submit.
    #[error("no events recorded yet")]
    EmptyLog,

    #[error("no player with id {0} in the roster")]
    UnknownPlayer(u32),

    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv output was not valid utf-8: {0}")]
    CsvEncoding(#[from] std::string::FromUtf8Error),

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    Config { var: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, TrackerError>;
