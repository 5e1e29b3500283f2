//! Pool-play schedule generation: pools, fixtures, referees, courts and times.

use crate::logic::court_time::{assign_courts_and_times, CourtTimeParams};
use crate::logic::pools::build_pools;
use crate::logic::referee::assign_referees;
use crate::logic::round_robin::generate_pool_matches;
use crate::models::{
    Courts, Match, Pool, ScheduleWarning, Team, TournamentError, TournamentId, TournamentSettings,
};
use serde::Serialize;

/// Division name for teams registered without a skill level.
pub const OPEN_DIVISION: &str = "Open";

/// Longest accepted game or warm-up, in minutes.
pub const MAX_SLOT_MINUTES: u32 = 24 * 60;

/// Most courts a schedule may spread over.
pub const MAX_COURTS: u32 = 256;

/// Generated pool play for a whole roster.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoolPlaySchedule {
    pub pools: Vec<Pool>,
    /// Ordered by round, then pool; court and time assigned.
    pub matches: Vec<Match>,
    pub courts_used: u32,
    pub warnings: Vec<ScheduleWarning>,
}

/// One division's share of a skill-partitioned schedule.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkillLevelSchedule {
    pub skill_level: String,
    pub teams: Vec<Team>,
    pub pools: Vec<Pool>,
    pub matches: Vec<Match>,
}

/// Generated pool play with one set of pools per skill level, sharing the courts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkillLevelPoolPlaySchedule {
    pub required_courts: u32,
    pub courts_used: u32,
    pub skill_levels: Vec<SkillLevelSchedule>,
    /// Every division's matches, ordered by round; court and time assigned.
    pub matches: Vec<Match>,
    pub warnings: Vec<ScheduleWarning>,
}

/// Courts needed to run one full round of every pool at once.
pub fn required_courts(pools: &[Pool]) -> u32 {
    let needed: usize = pools.iter().map(|p| p.teams.len() / 2).sum();
    (needed as u32).max(1)
}

fn validate(teams: &[Team], settings: &TournamentSettings) -> Result<(), TournamentError> {
    if teams.is_empty() {
        return Err(TournamentError::InvalidInput("no teams to schedule".into()));
    }
    if settings.estimated_game_duration_minutes == 0 {
        return Err(TournamentError::InvalidInput(
            "game duration must be positive".into(),
        ));
    }
    if settings.estimated_game_duration_minutes > MAX_SLOT_MINUTES
        || settings.warm_up_minutes > MAX_SLOT_MINUTES
    {
        return Err(TournamentError::InvalidInput(format!(
            "game duration and warm-up may not exceed {} minutes",
            MAX_SLOT_MINUTES
        )));
    }
    match settings.number_of_courts {
        Courts::Fixed(0) => Err(TournamentError::InvalidInput(
            "at least one court is required".into(),
        )),
        Courts::Fixed(n) if n > MAX_COURTS => Err(TournamentError::InvalidInput(format!(
            "at most {} courts are supported",
            MAX_COURTS
        ))),
        _ => Ok(()),
    }
}

fn court_params(settings: &TournamentSettings, required: u32) -> CourtTimeParams {
    CourtTimeParams {
        first_game_time: settings.first_game_time,
        game_duration_minutes: settings.estimated_game_duration_minutes,
        warm_up_minutes: settings.warm_up_minutes,
        number_of_courts: match settings.number_of_courts {
            Courts::Auto => required,
            Courts::Fixed(n) => n,
        },
    }
}

/// Round-robin fixtures of every pool, round 1 of all pools first, then round 2, ...
fn pool_fixtures(tournament_id: TournamentId, pools: &[Pool]) -> Vec<Match> {
    let mut matches: Vec<Match> = pools
        .iter()
        .flat_map(|p| generate_pool_matches(tournament_id, p))
        .collect();
    matches.sort_by_key(|m| m.round_number);
    matches
}

/// Build pools for `teams` (input order), generate fixtures, assign referees from the
/// whole roster, then courts and times.
pub fn generate_pool_play_schedule(
    tournament_id: TournamentId,
    teams: &[Team],
    settings: &TournamentSettings,
) -> Result<PoolPlaySchedule, TournamentError> {
    validate(teams, settings)?;

    let pools = build_pools(teams, None);
    let mut matches = pool_fixtures(tournament_id, &pools);
    let warnings = assign_referees(&mut matches, teams);

    let params = court_params(settings, required_courts(&pools));
    assign_courts_and_times(&mut matches, &params)?;

    log::info!(
        "Generated pool play for tournament {}: {} teams, {} pools, {} matches on {} court(s)",
        tournament_id,
        teams.len(),
        pools.len(),
        matches.len(),
        params.number_of_courts
    );

    Ok(PoolPlaySchedule {
        pools,
        matches,
        courts_used: params.number_of_courts,
        warnings,
    })
}

/// Split teams by skill level (first-seen order; no level means [`OPEN_DIVISION`]).
pub fn partition_by_skill_level(teams: &[Team]) -> Vec<(String, Vec<Team>)> {
    let mut partitions: Vec<(String, Vec<Team>)> = Vec::new();
    for team in teams {
        let level = team.skill_level.as_deref().unwrap_or(OPEN_DIVISION);
        match partitions.iter_mut().find(|(l, _)| l == level) {
            Some((_, members)) => members.push(team.clone()),
            None => partitions.push((level.to_string(), vec![team.clone()])),
        }
    }
    partitions
}

/// Like [`generate_pool_play_schedule`], but with separate pools per skill level.
///
/// Referees come from the fixture's own division. All divisions share the courts and are
/// timed together, round by round.
pub fn generate_pool_play_schedule_by_skill_level(
    tournament_id: TournamentId,
    teams: &[Team],
    settings: &TournamentSettings,
) -> Result<SkillLevelPoolPlaySchedule, TournamentError> {
    validate(teams, settings)?;

    let mut warnings = Vec::new();
    let mut skill_levels = Vec::new();
    let mut all_pools: Vec<Pool> = Vec::new();
    let mut all_matches: Vec<Match> = Vec::new();

    for (level, members) in partition_by_skill_level(teams) {
        let pools = build_pools(&members, Some(&level));
        let mut matches = pool_fixtures(tournament_id, &pools);
        warnings.extend(assign_referees(&mut matches, &members));
        all_pools.extend(pools.iter().cloned());
        all_matches.extend(matches);
        skill_levels.push(SkillLevelSchedule {
            skill_level: level,
            teams: members,
            pools,
            matches: Vec::new(),
        });
    }

    all_matches.sort_by_key(|m| m.round_number);
    let required = required_courts(&all_pools);
    let params = court_params(settings, required);
    assign_courts_and_times(&mut all_matches, &params)?;

    for level in &mut skill_levels {
        level.matches = all_matches
            .iter()
            .filter(|m| m.skill_level.as_deref() == Some(level.skill_level.as_str()))
            .cloned()
            .collect();
    }

    log::info!(
        "Generated pool play by skill level for tournament {}: {} division(s), {} matches, {} court(s) required",
        tournament_id,
        skill_levels.len(),
        all_matches.len(),
        required
    );

    Ok(SkillLevelPoolPlaySchedule {
        required_courts: required,
        courts_used: params.number_of_courts,
        skill_levels,
        matches: all_matches,
        warnings,
    })
}
