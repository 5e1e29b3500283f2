//! Result entry against the store.

use crate::logic::advance::AdvanceOutcome;
use crate::logic::playoffs::advance_winner_to_next_round;
use crate::models::{Match, MatchId, MatchPhase, TournamentError};
use crate::store::TournamentStore;
use serde::{Deserialize, Serialize};

/// Scores as entered by the scorekeeper.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    #[serde(default)]
    pub team1_score: u32,
    #[serde(default)]
    pub team2_score: u32,
    pub sets_won_team1: u32,
    pub sets_won_team2: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordedResult {
    #[serde(rename = "match")]
    pub game: Match,
    /// Playoff matches only.
    pub advancement: Option<AdvanceOutcome>,
    /// Advancement failure; the result itself is kept.
    pub advancement_error: Option<String>,
}

/// Complete a match and, for playoffs, move the winner on.
///
/// Only the first result for a match is accepted; later entries fail with
/// [`TournamentError::InvalidState`].
pub fn record_match_result<S: TournamentStore + ?Sized>(
    store: &S,
    match_id: MatchId,
    score: MatchScore,
) -> Result<RecordedResult, TournamentError> {
    let game = store.update_match(match_id, &mut |game| {
        game.record_result(
            score.team1_score,
            score.team2_score,
            score.sets_won_team1,
            score.sets_won_team2,
        )
    })?;

    let (advancement, advancement_error) = if game.phase == MatchPhase::Playoffs {
        match advance_winner_to_next_round(store, match_id) {
            Ok(outcome) => (Some(outcome), None),
            Err(e) => (None, Some(e.to_string())),
        }
    } else {
        (None, None)
    };

    Ok(RecordedResult {
        game,
        advancement,
        advancement_error,
    })
}
