//! Playoffs against the store: readiness check, bracket generation, winner advancement.

use crate::logic::advance::{completed_playoff_winner, slot_outcome, AdvanceOutcome};
use crate::logic::bracket::{build_bracket, next_slot};
use crate::logic::seeding::{seed_teams, PoolStandings, Seed};
use crate::logic::standings::{check_pool_completion, PoolCompletion};
use crate::models::{
    Advancement, BracketsMetadata, Match, MatchId, MatchPhase, ScheduleWarning, Tournament,
    TournamentError, TournamentId,
};
use crate::store::TournamentStore;
use chrono::Utc;
use serde::Serialize;

fn load_tournament<S: TournamentStore + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    store
        .tournament(tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))
}

/// Completion of every pool of a stored tournament.
pub fn pool_completion_status<S: TournamentStore + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<PoolCompletion, TournamentError> {
    let tournament = load_tournament(store, tournament_id)?;
    let matches = store.matches(tournament_id, Some(MatchPhase::PoolPlay))?;
    Ok(check_pool_completion(&matches, &tournament.teams))
}

/// One division's playoff bracket.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedBracket {
    pub skill_level: Option<String>,
    pub bracket_size: usize,
    pub total_rounds: u32,
    pub seeds: Vec<Seed>,
    pub matches: Vec<Match>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayoffsGenerated {
    pub brackets: Vec<GeneratedBracket>,
    pub metadata: BracketsMetadata,
    pub warnings: Vec<ScheduleWarning>,
}

impl PlayoffsGenerated {
    pub fn message(&self) -> String {
        let teams: usize = self.brackets.iter().map(|b| b.seeds.len()).sum();
        let matches: usize = self.brackets.iter().map(|b| b.matches.len()).sum();
        format!(
            "Generated {} bracket(s): {} teams advancing, {} playoff matches",
            self.brackets.len(),
            teams,
            matches
        )
    }
}

/// Seed and store playoff brackets once every pool is complete.
///
/// `advancement` overrides the tournament setting. One bracket is built per skill level
/// seen in pool play.
pub fn generate_playoff_brackets<S: TournamentStore + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
    advancement: Option<Advancement>,
) -> Result<PlayoffsGenerated, TournamentError> {
    let tournament = load_tournament(store, tournament_id)?;
    if tournament.brackets_generated {
        return Err(TournamentError::BracketsAlreadyGenerated);
    }
    let advancement = advancement.unwrap_or(tournament.settings.teams_per_pool_advancement);

    let pool_matches = store.matches(tournament_id, Some(MatchPhase::PoolPlay))?;
    if pool_matches.is_empty() {
        return Err(TournamentError::NoPoolPlayMatches);
    }
    let completion = check_pool_completion(&pool_matches, &tournament.teams);
    if !completion.ready_for_brackets {
        let pools = completion
            .pools
            .iter()
            .filter(|p| !p.is_complete)
            .map(|p| p.pool_name.clone())
            .collect();
        return Err(TournamentError::PoolsIncomplete { pools });
    }

    let mut divisions: Vec<(Option<String>, Vec<PoolStandings>)> = Vec::new();
    for pool in completion.pools {
        let standings = PoolStandings {
            pool_name: pool.pool_name,
            standings: pool.standings.unwrap_or_default(),
        };
        match divisions.iter_mut().find(|(level, _)| *level == pool.skill_level) {
            Some((_, pools)) => pools.push(standings),
            None => divisions.push((pool.skill_level, vec![standings])),
        }
    }

    let mut brackets = Vec::new();
    let mut warnings = Vec::new();
    for (skill_level, pools) in divisions {
        let seeds = seed_teams(&pools, advancement)?;
        let seed_ids: Vec<_> = seeds.iter().map(|s| s.team_id).collect();
        let (bracket, bye_warnings) = build_bracket(tournament_id, skill_level.as_deref(), &seed_ids);
        warnings.extend(bye_warnings);
        brackets.push(GeneratedBracket {
            skill_level,
            bracket_size: bracket.bracket_size,
            total_rounds: bracket.total_rounds,
            seeds,
            matches: bracket.into_matches(),
        });
    }

    let all_matches: Vec<Match> = brackets.iter().flat_map(|b| b.matches.iter().cloned()).collect();
    let metadata = BracketsMetadata {
        advancement_per_pool: advancement,
        bracket_size: brackets.iter().map(|b| b.bracket_size).max().unwrap_or(0),
        generated_at: Utc::now(),
    };
    // Rechecks the brackets flag under the store lock; a concurrent call that got here
    // first wins.
    store.insert_playoffs(tournament_id, &all_matches, metadata.clone())?;

    let generated = PlayoffsGenerated {
        brackets,
        metadata,
        warnings,
    };
    log::info!("Tournament {}: {}", tournament_id, generated.message());
    Ok(generated)
}

/// Push the winner of a completed playoff match into its next-round slot.
///
/// Safe to call repeatedly for the same match. A slot already holding a different team
/// is reported as [`TournamentError::SlotConflict`] and left unchanged.
pub fn advance_winner_to_next_round<S: TournamentStore + ?Sized>(
    store: &S,
    match_id: MatchId,
) -> Result<AdvanceOutcome, TournamentError> {
    let completed = store
        .get_match(match_id)?
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    let Some(winner) = completed_playoff_winner(&completed) else {
        log::debug!("Match {} is not a decided playoff match; nothing to advance", match_id);
        return Ok(AdvanceOutcome::NotReady);
    };

    let (round, match_number, slot) = next_slot(completed.round_number, completed.match_number);
    let next = store.find_playoff_match(
        completed.tournament_id,
        completed.skill_level.as_deref(),
        round,
        match_number,
    )?;
    let Some(next) = next else {
        log::info!("Team {} won the final (match {})", winner, match_id);
        return Ok(AdvanceOutcome::Champion { team_id: winner });
    };

    let write = store.set_team_slot(next.id, slot, winner)?;
    match slot_outcome(write, next.id, slot, winner) {
        Ok(outcome) => {
            log::info!(
                "Advanced team {} from match {} into {:?} ({:?} slot): {:?}",
                winner,
                match_id,
                next.bracket_position,
                slot,
                outcome
            );
            Ok(outcome)
        }
        Err(e) => {
            log::error!("Could not advance winner of match {}: {}", match_id, e);
            Err(e)
        }
    }
}
