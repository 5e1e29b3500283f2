//! Pool standings and pool completion.

use crate::models::{Match, MatchPhase, Team, TeamId, TeamStanding};
use serde::Serialize;
use std::cmp::Ordering;

/// Ranking order: win percentage, then set differential, then sets won (all descending).
pub fn compare_standings(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.win_percentage
        .total_cmp(&a.win_percentage)
        .then(b.sets_differential.cmp(&a.sets_differential))
        .then(b.sets_won.cmp(&a.sets_won))
}

fn team_name(teams: &[Team], id: TeamId) -> String {
    teams
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Standings for one pool from its completed matches; open matches are ignored.
///
/// Teams appear in first-seen order before sorting, and the sort is stable, so teams
/// with equal (win %, set diff, sets won) keep that order.
pub fn calculate_standings(matches: &[Match], teams: &[Team]) -> Vec<TeamStanding> {
    let mut standings: Vec<TeamStanding> = Vec::new();

    fn entry<'a>(
        standings: &'a mut Vec<TeamStanding>,
        teams: &[Team],
        id: TeamId,
    ) -> &'a mut TeamStanding {
        let idx = match standings.iter().position(|s| s.team_id == id) {
            Some(idx) => idx,
            None => {
                standings.push(TeamStanding::new(id, team_name(teams, id)));
                standings.len() - 1
            }
        };
        &mut standings[idx]
    }

    for m in matches.iter().filter(|m| m.is_completed()) {
        let (Some(team1), Some(team2)) = (m.team1_id, m.team2_id) else {
            continue;
        };
        let (sets1, sets2) = (m.sets_won_team1, m.sets_won_team2);

        let s1 = entry(&mut standings, teams, team1);
        s1.sets_won += sets1;
        s1.sets_lost += sets2;
        match sets1.cmp(&sets2) {
            Ordering::Greater => s1.wins += 1,
            Ordering::Less => s1.losses += 1,
            Ordering::Equal => {}
        }

        let s2 = entry(&mut standings, teams, team2);
        s2.sets_won += sets2;
        s2.sets_lost += sets1;
        match sets2.cmp(&sets1) {
            Ordering::Greater => s2.wins += 1,
            Ordering::Less => s2.losses += 1,
            Ordering::Equal => {}
        }
    }

    for s in &mut standings {
        let decided = s.wins + s.losses;
        s.win_percentage = if decided == 0 {
            0.0
        } else {
            f64::from(s.wins) / f64::from(decided)
        };
        s.sets_differential = i64::from(s.sets_won) - i64::from(s.sets_lost);
    }

    standings.sort_by(compare_standings);
    standings
}

/// Progress of one pool.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoolStatus {
    pub pool_name: String,
    pub skill_level: Option<String>,
    pub total_matches: usize,
    pub completed_matches: usize,
    pub is_complete: bool,
    /// Only computed once every match in the pool is complete.
    pub standings: Option<Vec<TeamStanding>>,
}

/// Progress of all pools of a tournament.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoolCompletion {
    pub pools: Vec<PoolStatus>,
    pub ready_for_brackets: bool,
}

/// Group pool-play matches by pool (first-seen order) and report completion per pool.
/// Playoff matches in `matches` are ignored.
pub fn check_pool_completion(matches: &[Match], teams: &[Team]) -> PoolCompletion {
    let mut grouped: Vec<(String, Option<String>, Vec<Match>)> = Vec::new();
    for m in matches.iter().filter(|m| m.phase == MatchPhase::PoolPlay) {
        let Some(pool_name) = m.pool_name.as_deref() else {
            continue;
        };
        match grouped.iter_mut().find(|(name, _, _)| name == pool_name) {
            Some((_, _, pool_matches)) => pool_matches.push(m.clone()),
            None => grouped.push((pool_name.to_string(), m.skill_level.clone(), vec![m.clone()])),
        }
    }

    let pools: Vec<PoolStatus> = grouped
        .into_iter()
        .map(|(pool_name, skill_level, pool_matches)| {
            let completed_matches = pool_matches.iter().filter(|m| m.is_completed()).count();
            let is_complete = completed_matches == pool_matches.len();
            PoolStatus {
                pool_name,
                skill_level,
                total_matches: pool_matches.len(),
                completed_matches,
                is_complete,
                standings: is_complete.then(|| calculate_standings(&pool_matches, teams)),
            }
        })
        .collect();

    let ready_for_brackets = !pools.is_empty() && pools.iter().all(|p| p.is_complete);
    PoolCompletion {
        pools,
        ready_for_brackets,
    }
}
