use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A player record as served by the roster endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub full_name: String,
    pub jersey_number: u32,
    /// Team identifier.
    pub team: u32,
}

/// The two sides of the match, each sorted by jersey number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub home: Vec<Player>,
    pub away: Vec<Player>,
}

impl Roster {
    /// Keep only the players of the two configured teams and order each side
    /// by ascending jersey number.
    pub fn from_players(players: Vec<Player>, home_team_id: u32, away_team_id: u32) -> Self {
        let (home, away): (Vec<_>, Vec<_>) = players
            .into_iter()
            .filter(|p| p.team == home_team_id || p.team == away_team_id)
            .partition(|p| p.team == home_team_id);

        Self {
            home: home.into_iter().sorted_by_key(|p| p.jersey_number).collect(),
            away: away.into_iter().sorted_by_key(|p| p.jersey_number).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.home.is_empty() && self.away.is_empty()
    }

    /// Look a player up by id on either side.
    pub fn find(&self, player_id: u32) -> Option<&Player> {
        self.home
            .iter()
            .chain(self.away.iter())
            .find(|p| p.id == player_id)
    }
}
