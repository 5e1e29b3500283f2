//! Pool, pool sizing plan, and derived per-team standings.

use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// A round-robin group. Members keep the order they were assigned in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// "A", "B", ... or "Advanced-A" when partitioned by skill level.
    pub name: String,
    pub teams: Vec<Team>,
    pub skill_level: Option<String>,
}

/// How many pools to build and how big each one is.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PoolConfiguration {
    pub num_pools: usize,
    pub teams_per_pool: Vec<usize>,
    pub total_matches: usize,
}

/// Derived ranking row for one team in one pool. Never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub sets_differential: i64,
    pub win_percentage: f64,
}

impl TeamStanding {
    pub fn new(team_id: TeamId, team_name: impl Into<String>) -> Self {
        Self {
            team_id,
            team_name: team_name.into(),
            wins: 0,
            losses: 0,
            sets_won: 0,
            sets_lost: 0,
            sets_differential: 0,
            win_percentage: 0.0,
        }
    }
}
