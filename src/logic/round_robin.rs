//! Round-robin fixture generation within a pool.

use crate::models::{Match, Pool, TournamentId};

/// Every unordered pair (i < j) of `n` pool members, grouped into rounds where no
/// member appears twice.
///
/// Pairs are listed in fixed order and packed greedily: each round takes every
/// remaining pair whose members are both still free in that round. This does not
/// guarantee the minimum number of rounds.
pub fn round_robin_rounds(n: usize) -> Vec<Vec<(usize, usize)>> {
    let mut remaining: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let mut rounds = Vec::new();
    while !remaining.is_empty() {
        let mut busy = vec![false; n];
        let mut round = Vec::new();
        remaining.retain(|&(i, j)| {
            if busy[i] || busy[j] {
                return true;
            }
            busy[i] = true;
            busy[j] = true;
            round.push((i, j));
            false
        });
        rounds.push(round);
    }
    rounds
}

/// Pool-play fixtures for one pool, ordered by round. Court, time and referee are unset.
///
/// Match numbers are 1-based within the pool. Pools with fewer than 2 teams get no matches.
pub fn generate_pool_matches(tournament_id: TournamentId, pool: &Pool) -> Vec<Match> {
    let mut matches = Vec::new();
    for (round_idx, round) in round_robin_rounds(pool.teams.len()).into_iter().enumerate() {
        for (i, j) in round {
            let mut m = Match::pool_play(
                tournament_id,
                pool.name.clone(),
                round_idx as u32 + 1,
                matches.len() as u32 + 1,
                pool.teams[i].id,
                pool.teams[j].id,
            );
            m.skill_level = pool.skill_level.clone();
            matches.push(m);
        }
    }
    matches
}
