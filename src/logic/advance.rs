//! Moving a playoff winner into the next round.
//!
//! Completion events can be delivered more than once, and the two feeder matches of a
//! slot pair can finish at the same time. Each write touches one slot only; writing the
//! team already there is a no-op, writing a different team is a conflict.

use crate::logic::bracket::{next_slot, Bracket};
use crate::models::{Match, MatchId, MatchPhase, Slot, TeamId, TournamentError};
use serde::Serialize;

/// Result of writing a team into a single slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotWrite {
    Written,
    AlreadySet,
    Conflict { existing: TeamId },
}

/// Fill `current` with `incoming` if empty.
pub fn write_slot(current: &mut Option<TeamId>, incoming: TeamId) -> SlotWrite {
    match *current {
        None => {
            *current = Some(incoming);
            SlotWrite::Written
        }
        Some(existing) if existing == incoming => SlotWrite::AlreadySet,
        Some(existing) => SlotWrite::Conflict { existing },
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AdvanceOutcome {
    Advanced {
        next_match_id: MatchId,
        slot: Slot,
        team_id: TeamId,
    },
    /// Same team was already in the slot (repeat delivery).
    AlreadyAdvanced {
        next_match_id: MatchId,
        slot: Slot,
        team_id: TeamId,
    },
    /// The final was completed; nothing further to fill.
    Champion { team_id: TeamId },
    /// Not a completed playoff match with a winner.
    NotReady,
}

/// Winner of `m` if it is a completed playoff match that has one.
pub fn completed_playoff_winner(m: &Match) -> Option<TeamId> {
    if m.phase != MatchPhase::Playoffs || !m.is_completed() {
        return None;
    }
    m.winner_id
}

/// Turn a slot write into an outcome, or a conflict error.
pub(crate) fn slot_outcome(
    write: SlotWrite,
    next_match_id: MatchId,
    slot: Slot,
    team_id: TeamId,
) -> Result<AdvanceOutcome, TournamentError> {
    match write {
        SlotWrite::Written => Ok(AdvanceOutcome::Advanced {
            next_match_id,
            slot,
            team_id,
        }),
        SlotWrite::AlreadySet => Ok(AdvanceOutcome::AlreadyAdvanced {
            next_match_id,
            slot,
            team_id,
        }),
        SlotWrite::Conflict { existing } => Err(TournamentError::SlotConflict {
            match_id: next_match_id,
            slot,
            existing,
            incoming: team_id,
        }),
    }
}

/// Apply a completed match to the in-memory bracket.
pub fn advance_in_bracket(
    bracket: &mut Bracket,
    completed: &Match,
) -> Result<AdvanceOutcome, TournamentError> {
    let Some(winner) = completed_playoff_winner(completed) else {
        return Ok(AdvanceOutcome::NotReady);
    };
    let (round, match_number, slot) = next_slot(completed.round_number, completed.match_number);
    let Some(next) = bracket.get_mut(round, match_number) else {
        return Ok(AdvanceOutcome::Champion { team_id: winner });
    };
    let write = write_slot(next.slot_mut(slot), winner);
    slot_outcome(write, next.id, slot, winner)
}
