//! Pick advancing teams from pool standings and order them into one seed list.

use crate::logic::standings::compare_standings;
use crate::models::{Advancement, TeamId, TeamStanding, TournamentError};
use serde::{Deserialize, Serialize};

/// Final standings of one pool, best first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolStandings {
    pub pool_name: String,
    pub standings: Vec<TeamStanding>,
}

/// One advancing team and where it finished.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    /// 1 is the top seed.
    pub seed: u32,
    pub team_id: TeamId,
    pub team_name: String,
    pub pool_name: String,
    /// 1-based finishing place inside its pool.
    pub pool_rank: u32,
}

/// Global seed list: every pool winner first (pool order), then every runner-up, and so
/// on. Teams sharing a finishing place are ordered by their standing stats; exact ties
/// stay in pool order.
pub fn seed_teams(
    pools: &[PoolStandings],
    advancement: Advancement,
) -> Result<Vec<Seed>, TournamentError> {
    let mut advancing: Vec<(u32, &str, &TeamStanding)> = pools
        .iter()
        .flat_map(|pool| {
            pool.standings
                .iter()
                .take(advancement.take_from(pool.standings.len()))
                .enumerate()
                .map(move |(rank, s)| (rank as u32 + 1, pool.pool_name.as_str(), s))
        })
        .collect();

    if advancing.is_empty() {
        return Err(TournamentError::NoTeamsToAdvance);
    }

    advancing.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| compare_standings(a.2, b.2)));

    Ok(advancing
        .into_iter()
        .enumerate()
        .map(|(i, (pool_rank, pool_name, s))| Seed {
            seed: i as u32 + 1,
            team_id: s.team_id,
            team_name: s.team_name.clone(),
            pool_name: pool_name.to_string(),
            pool_rank,
        })
        .collect())
}
