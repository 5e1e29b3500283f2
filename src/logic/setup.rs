//! Setup phase: turn the checked-in roster into stored pool-play matches.

use crate::logic::schedule::{
    generate_pool_play_schedule, generate_pool_play_schedule_by_skill_level,
};
use crate::models::{eligible_teams, Match, Pool, ScheduleWarning, TournamentError, TournamentId};
use crate::store::TournamentStore;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How to build pool play.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOptions {
    /// Separate pools (and later brackets) per skill level.
    #[serde(default)]
    pub by_skill_level: bool,
    /// Randomize roster order first instead of using registration order.
    #[serde(default)]
    pub shuffle: bool,
}

/// What was stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduledPoolPlay {
    pub pools: Vec<Pool>,
    pub matches: Vec<Match>,
    pub courts_used: u32,
    /// Only set for skill-level schedules.
    pub required_courts: Option<u32>,
    pub warnings: Vec<ScheduleWarning>,
}

/// Generate pool play for the tournament's checked-in teams and store it, replacing any
/// earlier pool-play schedule.
///
/// Refused once a pool-play result has been entered or playoffs exist.
pub fn schedule_pool_play<S: TournamentStore + ?Sized, R: Rng + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
    options: ScheduleOptions,
    rng: &mut R,
) -> Result<ScheduledPoolPlay, TournamentError> {
    let tournament = store
        .tournament(tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;

    let mut teams = eligible_teams(&tournament.teams);
    if options.shuffle {
        crate::logic::pools::shuffle_teams(&mut teams, rng);
    }

    let scheduled = if options.by_skill_level {
        let s = generate_pool_play_schedule_by_skill_level(tournament_id, &teams, &tournament.settings)?;
        ScheduledPoolPlay {
            pools: s.skill_levels.into_iter().flat_map(|l| l.pools).collect(),
            matches: s.matches,
            courts_used: s.courts_used,
            required_courts: Some(s.required_courts),
            warnings: s.warnings,
        }
    } else {
        let s = generate_pool_play_schedule(tournament_id, &teams, &tournament.settings)?;
        ScheduledPoolPlay {
            pools: s.pools,
            matches: s.matches,
            courts_used: s.courts_used,
            required_courts: None,
            warnings: s.warnings,
        }
    };

    // The result and playoff guards are checked by the store as it swaps the schedule in.
    let removed = store.replace_pool_play(tournament_id, &scheduled.matches)?;
    if removed > 0 {
        log::info!(
            "Replacing {} previously scheduled pool play match(es) for tournament {}",
            removed,
            tournament_id
        );
    }
    Ok(scheduled)
}
