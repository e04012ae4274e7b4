use std::env;
use std::str::FromStr;

use crate::error::{Result, TrackerError};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ROSTER_PATH: &str = "/api/players/";
pub const DEFAULT_UPLOAD_PATH: &str = "/api/events/upload-csv/";

/// Identifies the match being recorded and its two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub match_id: u32,
    pub home_team_id: u32,
    pub away_team_id: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            match_id: 1,
            home_team_id: 4,
            away_team_id: 5,
        }
    }
}

/// Endpoints, credentials and match identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub api_url: String,
    pub roster_path: String,
    pub upload_path: String,
    /// Bearer token for the roster endpoint. No header is sent when unset.
    pub api_token: Option<String>,
    pub session: SessionConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            roster_path: DEFAULT_ROSTER_PATH.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            api_token: None,
            session: SessionConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Read `TRACKER_*` variables, falling back to the defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let text = |name: &str, default: String| lookup(name).unwrap_or(default);

        Ok(Self {
            api_url: text("TRACKER_API_URL", defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            roster_path: text("TRACKER_ROSTER_PATH", defaults.roster_path),
            upload_path: text("TRACKER_UPLOAD_PATH", defaults.upload_path),
            api_token: lookup("TRACKER_API_TOKEN").filter(|t| !t.is_empty()),
            session: SessionConfig {
                match_id: parsed(&lookup, "TRACKER_MATCH_ID", defaults.session.match_id)?,
                home_team_id: parsed(&lookup, "TRACKER_HOME_TEAM", defaults.session.home_team_id)?,
                away_team_id: parsed(&lookup, "TRACKER_AWAY_TEAM", defaults.session.away_team_id)?,
            },
        })
    }

    pub fn roster_url(&self) -> String {
        format!("{}{}", self.api_url, self.roster_path)
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.api_url, self.upload_path)
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| TrackerError::Config {
            var,
            reason: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<TrackerConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TrackerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.roster_url(), "http://127.0.0.1:8000/api/players/");
        assert_eq!(
            config.upload_url(),
            "http://127.0.0.1:8000/api/events/upload-csv/"
        );
        assert_eq!(config.session.away_team_id, 5);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("TRACKER_API_URL", "https://stats.example.org/"),
            ("TRACKER_API_TOKEN", "secret"),
            ("TRACKER_MATCH_ID", "42"),
            ("TRACKER_HOME_TEAM", " 11 "),
            ("TRACKER_AWAY_TEAM", "12"),
        ])
        .unwrap();
        assert_eq!(config.roster_url(), "https://stats.example.org/api/players/");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(
            config.session,
            SessionConfig {
                match_id: 42,
                home_team_id: 11,
                away_team_id: 12,
            }
        );
    }

    #[test]
    fn test_malformed_number_is_reported() {
        let err = from_pairs(&[("TRACKER_MATCH_ID", "first")]).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Config {
                var: "TRACKER_MATCH_ID",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_token_means_no_auth() {
        let config = from_pairs(&[("TRACKER_API_TOKEN", "")]).unwrap();
        assert!(config.api_token.is_none());
    }
}
