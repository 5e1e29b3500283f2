//! Single-elimination bracket: sizing, labels, and the (round, match) arena.

use crate::logic::advance::advance_in_bracket;
use crate::models::{Match, MatchStatus, ScheduleWarning, Slot, TeamId, TournamentId};

/// Playoff matches rotate over this many courts.
pub const PLAYOFF_COURTS: u32 = 4;

/// Smallest power of two that holds `team_count` teams (0 for no teams).
pub fn bracket_size_for(team_count: usize) -> usize {
    if team_count == 0 {
        0
    } else {
        team_count.next_power_of_two()
    }
}

/// Where the winner of (round, match) plays next: round + 1, match ⌈m/2⌉, team1 slot for
/// odd match numbers and team2 slot for even ones.
pub fn next_slot(round_number: u32, match_number: u32) -> (u32, u32, Slot) {
    let slot = if match_number % 2 == 1 {
        Slot::Team1
    } else {
        Slot::Team2
    };
    (round_number + 1, match_number.div_ceil(2), slot)
}

/// Human label for a playoff match.
pub fn bracket_position(round_number: u32, match_number: u32, total_rounds: u32) -> String {
    if round_number == total_rounds {
        "Final".to_string()
    } else if round_number + 1 == total_rounds {
        let side = if match_number == 1 { 'A' } else { 'B' };
        format!("Semifinal {}", side)
    } else if round_number + 2 == total_rounds {
        format!("Quarterfinal {}", match_number)
    } else {
        format!("Round {} - Match {}", round_number, match_number)
    }
}

/// Playoff matches of one division, addressable by (round, match number).
#[derive(Clone, Debug, PartialEq)]
pub struct Bracket {
    pub skill_level: Option<String>,
    pub bracket_size: usize,
    pub total_rounds: u32,
    rounds: Vec<Vec<Match>>,
}

impl Bracket {
    pub fn get(&self, round_number: u32, match_number: u32) -> Option<&Match> {
        let r = (round_number as usize).checked_sub(1)?;
        let m = (match_number as usize).checked_sub(1)?;
        self.rounds.get(r)?.get(m)
    }

    pub fn get_mut(&mut self, round_number: u32, match_number: u32) -> Option<&mut Match> {
        let r = (round_number as usize).checked_sub(1)?;
        let m = (match_number as usize).checked_sub(1)?;
        self.rounds.get_mut(r)?.get_mut(m)
    }

    /// Matches of a 1-based round.
    pub fn round(&self, round_number: u32) -> &[Match] {
        (round_number as usize)
            .checked_sub(1)
            .and_then(|r| self.rounds.get(r))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.rounds.into_iter().flatten().collect()
    }
}

/// Build the whole bracket for seeds in order (index 0 is the top seed).
///
/// First-round match i pairs seed i with seed `bracket_size - 1 - i`; seeds past the end
/// are byes. A bye match is completed on the spot and its team moved into round 2.
/// Later rounds are empty placeholders.
pub fn build_bracket(
    tournament_id: TournamentId,
    skill_level: Option<&str>,
    seeds: &[TeamId],
) -> (Bracket, Vec<ScheduleWarning>) {
    let bracket_size = bracket_size_for(seeds.len());
    let total_rounds = if bracket_size == 0 {
        0
    } else {
        bracket_size.trailing_zeros()
    };

    let rounds: Vec<Vec<Match>> = (1..=total_rounds)
        .map(|round| {
            let count = bracket_size >> round;
            (1..=count as u32)
                .map(|match_number| {
                    let mut m = Match::playoff(tournament_id, round, match_number);
                    m.court_number = (match_number - 1) % PLAYOFF_COURTS + 1;
                    m.bracket_position = Some(bracket_position(round, match_number, total_rounds));
                    m.skill_level = skill_level.map(str::to_string);
                    if round == 1 {
                        let i = match_number as usize - 1;
                        m.team1_id = seeds.get(i).copied();
                        m.team2_id = seeds.get(bracket_size - 1 - i).copied();
                    }
                    m
                })
                .collect()
        })
        .collect();

    let mut bracket = Bracket {
        skill_level: skill_level.map(str::to_string),
        bracket_size,
        total_rounds,
        rounds,
    };

    let mut warnings = Vec::new();
    let byes: Vec<u32> = bracket
        .round(1)
        .iter()
        .filter(|m| m.team1_id.is_some() != m.team2_id.is_some())
        .map(|m| m.match_number)
        .collect();
    for match_number in byes {
        let Some(m) = bracket.get_mut(1, match_number) else {
            continue;
        };
        let Some(team_id) = m.team1_id.or(m.team2_id) else {
            continue;
        };
        m.status = MatchStatus::Completed;
        m.winner_id = Some(team_id);
        let completed = m.clone();
        log::info!(
            "Bye: team {} advances from {:?} without playing",
            team_id,
            completed.bracket_position
        );
        warnings.push(ScheduleWarning::FirstRoundBye {
            match_id: completed.id,
            team_id,
            skill_level: completed.skill_level.clone(),
        });
        // Fresh bracket: the round-2 slot is empty, so this cannot conflict.
        if let Err(e) = advance_in_bracket(&mut bracket, &completed) {
            log::error!("Failed to advance bye winner {}: {}", team_id, e);
        }
    }

    (bracket, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_by_distance_from_final() {
        assert_eq!(bracket_position(4, 1, 4), "Final");
        assert_eq!(bracket_position(3, 1, 4), "Semifinal A");
        assert_eq!(bracket_position(3, 2, 4), "Semifinal B");
        assert_eq!(bracket_position(2, 3, 4), "Quarterfinal 3");
        assert_eq!(bracket_position(1, 5, 4), "Round 1 - Match 5");
    }

    #[test]
    fn next_slot_halves_match_number() {
        assert_eq!(next_slot(1, 3), (2, 2, Slot::Team1));
        assert_eq!(next_slot(1, 4), (2, 2, Slot::Team2));
        assert_eq!(next_slot(2, 1), (3, 1, Slot::Team1));
    }

    #[test]
    fn sizes_round_up_to_power_of_two() {
        assert_eq!(bracket_size_for(0), 0);
        assert_eq!(bracket_size_for(1), 1);
        assert_eq!(bracket_size_for(5), 8);
        assert_eq!(bracket_size_for(8), 8);
    }
}
