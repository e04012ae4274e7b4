//! Record in-match rugby events against a running match clock and upload
//! them in one CSV batch.
//!
//! An [`EventSession`] holds the roster, the [`MatchTimer`], the event being
//! composed and the log of confirmed events. The remote roster and
//! ingestion services sit behind [`TrackerBackend`]; [`TrackerClient`] is
//! the HTTP implementation.

mod client;
pub mod clock;
mod config;
mod error;
pub mod export;
pub mod model;
pub mod notice;
mod session;
pub mod timer;

pub use client::{TrackerBackend, TrackerClient, UploadBatch};
pub use clock::{format_clock, MatchClock};
pub use config::{SessionConfig, TrackerConfig};
pub use error::{ApiError, Result, TrackerError};
pub use model::*;
pub use notice::{Notice, NoticeBoard, Severity};
pub use session::EventSession;
pub use timer::MatchTimer;
