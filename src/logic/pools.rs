//! Pool sizing and pool building.
//!
//! Pools of 4 (6 matches each) are preferred over pools of 5 (10 matches) to keep the
//! day short. Leftover teams go into one smaller pool, except that a single leftover
//! team is folded into the last pool so nobody ends up alone.

use crate::models::{Pool, PoolConfiguration, Team};
use rand::seq::SliceRandom;
use rand::Rng;

const PREFERRED_POOL_SIZE: usize = 4;

/// Number of round-robin matches in a pool of `size` teams.
pub fn matches_in_pool(size: usize) -> usize {
    size * size.saturating_sub(1) / 2
}

/// Decide pool count and sizes for `team_count` teams.
pub fn plan_pools(team_count: usize) -> PoolConfiguration {
    if team_count == 0 {
        return PoolConfiguration::default();
    }

    let teams_per_pool = if team_count <= PREFERRED_POOL_SIZE {
        vec![team_count]
    } else {
        let full_pools = team_count / PREFERRED_POOL_SIZE;
        let mut sizes = vec![PREFERRED_POOL_SIZE; full_pools];
        match team_count % PREFERRED_POOL_SIZE {
            0 => {}
            // full_pools >= 1 here since team_count > 4
            1 => {
                if let Some(last) = sizes.last_mut() {
                    *last += 1;
                }
            }
            remainder => sizes.push(remainder),
        }
        sizes
    };

    PoolConfiguration {
        num_pools: teams_per_pool.len(),
        total_matches: teams_per_pool.iter().map(|&s| matches_in_pool(s)).sum(),
        teams_per_pool,
    }
}

/// Pool letter for a 0-based index: A..Z, then AA, AB, ...
fn pool_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Pool name for index `index`, namespaced by skill level when given ("Advanced-A").
pub fn pool_name(index: usize, skill_level: Option<&str>) -> String {
    match skill_level {
        Some(level) => format!("{}-{}", level, pool_letter(index)),
        None => pool_letter(index),
    }
}

/// Build named pools and fill them with `teams` in input order (no shuffling).
pub fn build_pools(teams: &[Team], skill_level: Option<&str>) -> Vec<Pool> {
    let plan = plan_pools(teams.len());
    let mut remaining = teams;
    plan.teams_per_pool
        .iter()
        .enumerate()
        .map(|(i, &size)| {
            let (members, rest) = remaining.split_at(size);
            remaining = rest;
            Pool {
                name: pool_name(i, skill_level),
                teams: members.to_vec(),
                skill_level: skill_level.map(str::to_string),
            }
        })
        .collect()
}

/// Randomize roster order before building pools. Only called when the organizer asks for it.
pub fn shuffle_teams<R: Rng + ?Sized>(teams: &mut [Team], rng: &mut R) {
    teams.shuffle(rng);
}
