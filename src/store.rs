//! Persistence boundary: typed tournament and match records.
//!
//! The scheduling logic only talks to [`TournamentStore`]. [`InMemoryStore`] backs the web
//! binary and the tests; tournaments untouched for a while can be purged.

use crate::logic::{write_slot, SlotWrite};
use crate::models::{
    BracketsMetadata, Match, MatchId, MatchPhase, Slot, TeamId, Tournament, TournamentError,
    TournamentId,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// Failure inside the backing store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for TournamentError {
    fn from(e: StoreError) -> Self {
        TournamentError::Store(e.0)
    }
}

/// Records the scheduler reads and writes.
///
/// Each method is one atomic step. Checks that guard a write run under the same lock as
/// the write, so concurrent callers cannot both pass them.
pub trait TournamentStore: Send + Sync {
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;

    /// Insert or replace a tournament (roster, settings, flags). Its matches are untouched.
    fn save_tournament(&self, tournament: Tournament) -> Result<(), StoreError>;

    /// Apply `change` to a stored tournament and return the result. Nothing is written
    /// when `change` fails.
    fn update_tournament(
        &self,
        id: TournamentId,
        change: &mut dyn FnMut(&mut Tournament) -> Result<(), TournamentError>,
    ) -> Result<Tournament, TournamentError>;

    /// Matches of a tournament in insertion order, optionally only one phase.
    fn matches(
        &self,
        tournament_id: TournamentId,
        phase: Option<MatchPhase>,
    ) -> Result<Vec<Match>, StoreError>;

    fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError>;

    /// Apply `change` to a stored match and return the result. Nothing is written when
    /// `change` fails.
    fn update_match(
        &self,
        id: MatchId,
        change: &mut dyn FnMut(&mut Match) -> Result<(), TournamentError>,
    ) -> Result<Match, TournamentError>;

    /// Swap in a new pool-play schedule; returns how many old matches were removed.
    /// Refused once a pool-play result exists or playoffs were generated.
    fn replace_pool_play(
        &self,
        tournament_id: TournamentId,
        matches: &[Match],
    ) -> Result<usize, TournamentError>;

    /// Store playoff matches and set the brackets flag, unless it is already set.
    fn insert_playoffs(
        &self,
        tournament_id: TournamentId,
        matches: &[Match],
        metadata: BracketsMetadata,
    ) -> Result<(), TournamentError>;

    /// The playoff match at (round, match number) of one division.
    fn find_playoff_match(
        &self,
        tournament_id: TournamentId,
        skill_level: Option<&str>,
        round_number: u32,
        match_number: u32,
    ) -> Result<Option<Match>, StoreError>;

    /// Atomically fill one team slot if it is empty. Only that field is written.
    fn set_team_slot(
        &self,
        match_id: MatchId,
        slot: Slot,
        team_id: TeamId,
    ) -> Result<SlotWrite, StoreError>;
}

struct Entry {
    tournament: Tournament,
    matches: Vec<Match>,
    last_activity: Instant,
}

impl Entry {
    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Everything in memory behind one lock.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<TournamentId, Entry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<TournamentId, Entry>>, StoreError> {
        self.entries
            .read()
            .map_err(|_| StoreError("lock error".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<TournamentId, Entry>>, StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError("lock error".into()))
    }

    /// Remove tournaments with no writes or lookups for `timeout`. Returns how many were removed.
    pub fn purge_inactive(&self, timeout: Duration) -> Result<usize, StoreError> {
        let mut g = self.write()?;
        let before = g.len();
        g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
        Ok(before - g.len())
    }

    pub fn len(&self) -> usize {
        self.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The entry holding a match, and the match's index in it.
fn match_entry_mut(
    entries: &mut HashMap<TournamentId, Entry>,
    id: MatchId,
) -> Option<(&mut Entry, usize)> {
    entries.values_mut().find_map(|entry| {
        let index = entry.matches.iter().position(|m| m.id == id)?;
        Some((entry, index))
    })
}

impl TournamentStore for InMemoryStore {
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        let mut g = self.write()?;
        Ok(g.get_mut(&id).map(|entry| {
            entry.touch();
            entry.tournament.clone()
        }))
    }

    fn save_tournament(&self, tournament: Tournament) -> Result<(), StoreError> {
        let mut g = self.write()?;
        match g.get_mut(&tournament.id) {
            Some(entry) => {
                entry.tournament = tournament;
                entry.touch();
            }
            None => {
                g.insert(
                    tournament.id,
                    Entry {
                        tournament,
                        matches: Vec::new(),
                        last_activity: Instant::now(),
                    },
                );
            }
        }
        Ok(())
    }

    fn update_tournament(
        &self,
        id: TournamentId,
        change: &mut dyn FnMut(&mut Tournament) -> Result<(), TournamentError>,
    ) -> Result<Tournament, TournamentError> {
        let mut g = self.write()?;
        let entry = g
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        entry.touch();
        let mut updated = entry.tournament.clone();
        change(&mut updated)?;
        entry.tournament = updated.clone();
        Ok(updated)
    }

    fn matches(
        &self,
        tournament_id: TournamentId,
        phase: Option<MatchPhase>,
    ) -> Result<Vec<Match>, StoreError> {
        let mut g = self.write()?;
        Ok(g.get_mut(&tournament_id)
            .map(|entry| {
                entry.touch();
                entry
                    .matches
                    .iter()
                    .filter(|m| phase.map_or(true, |p| m.phase == p))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        let mut g = self.write()?;
        Ok(match_entry_mut(&mut g, id).map(|(entry, index)| {
            entry.touch();
            entry.matches[index].clone()
        }))
    }

    fn update_match(
        &self,
        id: MatchId,
        change: &mut dyn FnMut(&mut Match) -> Result<(), TournamentError>,
    ) -> Result<Match, TournamentError> {
        let mut g = self.write()?;
        let (entry, index) =
            match_entry_mut(&mut g, id).ok_or(TournamentError::MatchNotFound(id))?;
        entry.touch();
        let mut updated = entry.matches[index].clone();
        change(&mut updated)?;
        entry.matches[index] = updated.clone();
        Ok(updated)
    }

    fn replace_pool_play(
        &self,
        tournament_id: TournamentId,
        matches: &[Match],
    ) -> Result<usize, TournamentError> {
        let mut g = self.write()?;
        let entry = g
            .get_mut(&tournament_id)
            .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
        entry.touch();
        if entry.tournament.brackets_generated {
            return Err(TournamentError::InvalidState(
                "playoffs already generated".into(),
            ));
        }
        let pool_play = |m: &Match| m.phase == MatchPhase::PoolPlay;
        if entry.matches.iter().any(|m| pool_play(m) && m.is_completed()) {
            return Err(TournamentError::InvalidState(
                "pool play results have already been entered".into(),
            ));
        }
        let before = entry.matches.len();
        entry.matches.retain(|m| !pool_play(m));
        let removed = before - entry.matches.len();
        entry.matches.extend(matches.iter().cloned());
        Ok(removed)
    }

    fn insert_playoffs(
        &self,
        tournament_id: TournamentId,
        matches: &[Match],
        metadata: BracketsMetadata,
    ) -> Result<(), TournamentError> {
        let mut g = self.write()?;
        let entry = g
            .get_mut(&tournament_id)
            .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
        entry.touch();
        if entry.tournament.brackets_generated {
            return Err(TournamentError::BracketsAlreadyGenerated);
        }
        entry.matches.extend(matches.iter().cloned());
        entry.tournament.brackets_generated = true;
        entry.tournament.brackets_metadata = Some(metadata);
        Ok(())
    }

    fn find_playoff_match(
        &self,
        tournament_id: TournamentId,
        skill_level: Option<&str>,
        round_number: u32,
        match_number: u32,
    ) -> Result<Option<Match>, StoreError> {
        let mut g = self.write()?;
        Ok(g.get_mut(&tournament_id).and_then(|entry| {
            entry.touch();
            entry
                .matches
                .iter()
                .find(|m| {
                    m.phase == MatchPhase::Playoffs
                        && m.skill_level.as_deref() == skill_level
                        && m.round_number == round_number
                        && m.match_number == match_number
                })
                .cloned()
        }))
    }

    fn set_team_slot(
        &self,
        match_id: MatchId,
        slot: Slot,
        team_id: TeamId,
    ) -> Result<SlotWrite, StoreError> {
        let mut g = self.write()?;
        let (entry, index) = match_entry_mut(&mut g, match_id)
            .ok_or_else(|| StoreError(format!("unknown match {}", match_id)))?;
        entry.touch();
        Ok(write_slot(entry.matches[index].slot_mut(slot), team_id))
    }
}
