use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Coarse field region, derived from the x coordinate only.
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
)]
pub enum Zone {
    #[strum(serialize = "Own 22")]
    #[serde(rename = "Own 22")]
    Own22,
    #[strum(serialize = "Own Half")]
    #[serde(rename = "Own Half")]
    OwnHalf,
    #[strum(serialize = "Opponent Half")]
    #[serde(rename = "Opponent Half")]
    OpponentHalf,
    #[strum(serialize = "Opponent 22")]
    #[serde(rename = "Opponent 22")]
    Opponent22,
}

impl Zone {
    /// Classify a normalized x coordinate. Boundary values belong to the
    /// upper bracket.
    pub fn from_x(x: f64) -> Self {
        if x < 22.0 {
            Zone::Own22
        } else if x < 50.0 {
            Zone::OwnHalf
        } else if x < 78.0 {
            Zone::OpponentHalf
        } else {
            Zone::Opponent22
        }
    }
}

/// On-screen bounding box of the clickable field surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A point on the pitch as percentages of the field dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchLocation {
    pub x: f64,
    pub y: f64,
    pub zone: Zone,
}

impl PitchLocation {
    /// Build a location from normalized coordinates, computing the zone afresh.
    ///
    /// Finite values are clamped to [0,100]; NaN and infinities are rejected.
    pub fn new(x: f64, y: f64) -> Result<Self> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(TrackerError::InvalidCoordinate { x, y });
        }
        let x = round2(x.clamp(0.0, 100.0));
        let y = round2(y.clamp(0.0, 100.0));
        Ok(Self {
            x,
            y,
            zone: Zone::from_x(x),
        })
    }

    /// Normalize a click in client coordinates against the field's bounds.
    pub fn from_click(client_x: f64, client_y: f64, bounds: FieldBounds) -> Result<Self> {
        if !(bounds.width > 0.0 && bounds.height > 0.0) {
            return Err(TrackerError::InvalidFieldBounds);
        }
        let x = (client_x - bounds.left) / bounds.width * 100.0;
        let y = (client_y - bounds.top) / bounds.height * 100.0;
        Self::new(x, y)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
