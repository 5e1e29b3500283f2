//! Court and start-time assignment.
//!
//! Greedy and single pass: each match goes, in order, to the court where its two teams
//! and referee would be shortest of their desired rest. It minimizes locally and never
//! backtracks, so some rest shortfall can remain.

use crate::models::{Match, TeamId, TournamentError};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Gap left on a court between one match ending and the next warm-up.
pub const COURT_TRANSITION_MINUTES: i64 = 5;

/// Inputs for [`assign_courts_and_times`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CourtTimeParams {
    pub first_game_time: DateTime<Utc>,
    pub game_duration_minutes: u32,
    pub warm_up_minutes: u32,
    pub number_of_courts: u32,
}

impl CourtTimeParams {
    /// Rest a team should get between two starts: one game plus warm-up.
    pub fn desired_rest(&self) -> Duration {
        Duration::minutes(i64::from(self.game_duration_minutes) + i64::from(self.warm_up_minutes))
    }

    /// How far a court's next start moves after each match.
    pub fn court_slot(&self) -> Duration {
        self.desired_rest() + Duration::minutes(COURT_TRANSITION_MINUTES)
    }
}

/// Milliseconds of rest each entity would be short of if it played at `start`.
/// Entities that have not played yet have unlimited rest.
fn rest_shortfall(
    start: DateTime<Utc>,
    entities: &[TeamId],
    last_played: &HashMap<TeamId, DateTime<Utc>>,
    desired_rest: Duration,
) -> i64 {
    entities
        .iter()
        .filter_map(|id| last_played.get(id))
        .map(|&last| (desired_rest - (start - last)).num_milliseconds().max(0))
        .sum()
}

/// Assign `court_number` (1-based) and `scheduled_time` to every match, in order.
///
/// Court choice: least total rest shortfall for team1, team2 and referee, then earliest
/// free court, then lowest court number. With zero courts nothing is assigned.
/// A start time past the end of the calendar is an input error.
pub fn assign_courts_and_times(
    matches: &mut [Match],
    params: &CourtTimeParams,
) -> Result<(), TournamentError> {
    let desired_rest = params.desired_rest();
    let slot = params.court_slot();
    let mut court_free = vec![params.first_game_time; params.number_of_courts as usize];
    let mut last_played: HashMap<TeamId, DateTime<Utc>> = HashMap::new();

    for m in matches.iter_mut() {
        let entities: Vec<TeamId> = [m.team1_id, m.team2_id, m.referee_team_id]
            .into_iter()
            .flatten()
            .collect();

        let best = court_free
            .iter()
            .enumerate()
            .min_by_key(|&(court, &free)| {
                (
                    rest_shortfall(free, &entities, &last_played, desired_rest),
                    free,
                    court,
                )
            })
            .map(|(court, &free)| (court, free));
        let Some((court, start)) = best else {
            return Ok(());
        };

        m.court_number = court as u32 + 1;
        m.scheduled_time = Some(start);
        for id in entities {
            last_played.insert(id, start);
        }
        court_free[court] = start.checked_add_signed(slot).ok_or_else(|| {
            TournamentError::InvalidInput("schedule runs past the latest representable time".into())
        })?;
    }
    Ok(())
}
