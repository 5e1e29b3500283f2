//! Match record, phase and status.

use crate::models::team::TeamId;
use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Phase of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    PoolPlay,
    Playoffs,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Completed,
}

/// Which team slot of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Team1,
    Team2,
}

/// A single fixture, pool play or playoffs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub phase: MatchPhase,
    /// Pool name; pool play only.
    pub pool_name: Option<String>,
    pub round_number: u32,
    pub match_number: u32,
    /// None for playoff placeholders and byes.
    pub team1_id: Option<TeamId>,
    pub team2_id: Option<TeamId>,
    pub referee_team_id: Option<TeamId>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub court_number: u32,
    pub status: MatchStatus,
    pub team1_score: u32,
    pub team2_score: u32,
    pub sets_won_team1: u32,
    pub sets_won_team2: u32,
    pub winner_id: Option<TeamId>,
    /// Human label for playoff matches ("Final", "Semifinal A", ...).
    pub bracket_position: Option<String>,
    pub skill_level: Option<String>,
}

impl Match {
    /// A scheduled pool-play fixture between two teams. Court, time and referee are unset.
    pub fn pool_play(
        tournament_id: TournamentId,
        pool_name: impl Into<String>,
        round_number: u32,
        match_number: u32,
        team1_id: TeamId,
        team2_id: TeamId,
    ) -> Self {
        Self {
            pool_name: Some(pool_name.into()),
            team1_id: Some(team1_id),
            team2_id: Some(team2_id),
            ..Self::blank(tournament_id, MatchPhase::PoolPlay, round_number, match_number)
        }
    }

    /// An empty playoff match at (round, match number).
    pub fn playoff(tournament_id: TournamentId, round_number: u32, match_number: u32) -> Self {
        Self::blank(tournament_id, MatchPhase::Playoffs, round_number, match_number)
    }

    fn blank(
        tournament_id: TournamentId,
        phase: MatchPhase,
        round_number: u32,
        match_number: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            phase,
            pool_name: None,
            round_number,
            match_number,
            team1_id: None,
            team2_id: None,
            referee_team_id: None,
            scheduled_time: None,
            court_number: 0,
            status: MatchStatus::Scheduled,
            team1_score: 0,
            team2_score: 0,
            sets_won_team1: 0,
            sets_won_team2: 0,
            winner_id: None,
            bracket_position: None,
            skill_level: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Option<TeamId> {
        match slot {
            Slot::Team1 => &mut self.team1_id,
            Slot::Team2 => &mut self.team2_id,
        }
    }

    /// True if the team plays in this match (referee excluded).
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team1_id == Some(team_id) || self.team2_id == Some(team_id)
    }

    /// Enter a result: scheduled -> completed, exactly once.
    ///
    /// The winner is the side with more sets; an even set count leaves no winner.
    pub fn record_result(
        &mut self,
        team1_score: u32,
        team2_score: u32,
        sets_won_team1: u32,
        sets_won_team2: u32,
    ) -> Result<(), TournamentError> {
        if self.is_completed() {
            return Err(TournamentError::InvalidState(format!(
                "match {} already has a result",
                self.id
            )));
        }
        let (Some(team1), Some(team2)) = (self.team1_id, self.team2_id) else {
            return Err(TournamentError::InvalidState(format!(
                "match {} does not have two teams yet",
                self.id
            )));
        };
        self.team1_score = team1_score;
        self.team2_score = team2_score;
        self.sets_won_team1 = sets_won_team1;
        self.sets_won_team2 = sets_won_team2;
        self.winner_id = match sets_won_team1.cmp(&sets_won_team2) {
            std::cmp::Ordering::Greater => Some(team1),
            std::cmp::Ordering::Less => Some(team2),
            std::cmp::Ordering::Equal => None,
        };
        self.status = MatchStatus::Completed;
        Ok(())
    }
}
