//! Tournament, its settings, and the error/warning types shared by scheduling and playoffs.

use crate::models::game::{MatchId, Slot};
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Broad class of a [`TournamentError`], used to pick a response status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Input,
    NotFound,
    IncompleteData,
    Conflict,
    InvalidState,
    Internal,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Empty roster, non-positive duration, zero courts, bad CSV row...
    InvalidInput(String),
    /// A team with this name already exists (case-insensitive).
    DuplicateTeamName(String),
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    TeamNotFound(TeamId),
    /// Playoffs requested but no pool play has been scheduled.
    NoPoolPlayMatches,
    /// Playoffs requested while these pools still have open matches.
    PoolsIncomplete { pools: Vec<String> },
    NoTeamsToAdvance,
    BracketsAlreadyGenerated,
    /// Next-round slot already holds a different team.
    SlotConflict {
        match_id: MatchId,
        slot: Slot,
        existing: TeamId,
        incoming: TeamId,
    },
    InvalidState(String),
    /// The backing store failed.
    Store(String),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            InvalidInput(_) | DuplicateTeamName(_) => ErrorKind::Input,
            TournamentNotFound(_) | MatchNotFound(_) | TeamNotFound(_) | NoPoolPlayMatches => {
                ErrorKind::NotFound
            }
            PoolsIncomplete { .. } | NoTeamsToAdvance => ErrorKind::IncompleteData,
            SlotConflict { .. } | BracketsAlreadyGenerated => ErrorKind::Conflict,
            InvalidState(_) => ErrorKind::InvalidState,
            Store(_) => ErrorKind::Internal,
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TournamentError::DuplicateTeamName(name) => {
                write!(f, "A team named '{}' already exists", name)
            }
            TournamentError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::TeamNotFound(id) => write!(f, "Team {} not found", id),
            TournamentError::NoPoolPlayMatches => write!(f, "No pool play matches found"),
            TournamentError::PoolsIncomplete { pools } => {
                write!(f, "Pool play is not complete (pools: {})", pools.join(", "))
            }
            TournamentError::NoTeamsToAdvance => write!(f, "No teams available to advance"),
            TournamentError::BracketsAlreadyGenerated => {
                write!(f, "Playoff brackets have already been generated")
            }
            TournamentError::SlotConflict {
                match_id,
                slot,
                existing,
                incoming,
            } => write!(
                f,
                "Match {} {:?} slot already holds team {} (refusing to write {})",
                match_id, slot, existing, incoming
            ),
            TournamentError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            TournamentError::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Accepted degenerate outcomes: recorded, never failures.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ScheduleWarning {
    /// Nobody outside the two playing teams could referee.
    NoEligibleReferee {
        match_id: MatchId,
        pool_name: Option<String>,
    },
    /// First playoff round slot with no opponent; the team advanced directly.
    FirstRoundBye {
        match_id: MatchId,
        team_id: TeamId,
        skill_level: Option<String>,
    },
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Number of courts available for pool play.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Courts {
    /// Use as many courts as the busiest round needs.
    #[default]
    Auto,
    Fixed(u32),
}

/// How many teams per pool move on to playoffs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advancement {
    #[default]
    All,
    Top(u32),
}

impl Advancement {
    /// Number of teams taken from a pool with `pool_len` ranked teams.
    pub fn take_from(&self, pool_len: usize) -> usize {
        match self {
            Advancement::All => pool_len,
            Advancement::Top(n) => (*n as usize).min(pool_len),
        }
    }
}

fn default_game_duration() -> u32 {
    20
}

fn default_warm_up() -> u32 {
    7
}

/// Tournament day configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    pub first_game_time: DateTime<Utc>,
    #[serde(default = "default_game_duration")]
    pub estimated_game_duration_minutes: u32,
    #[serde(default = "default_warm_up")]
    pub warm_up_minutes: u32,
    #[serde(default)]
    pub number_of_courts: Courts,
    #[serde(default)]
    pub teams_per_pool_advancement: Advancement,
}

impl TournamentSettings {
    pub fn new(first_game_time: DateTime<Utc>) -> Self {
        Self {
            first_game_time,
            estimated_game_duration_minutes: default_game_duration(),
            warm_up_minutes: default_warm_up(),
            number_of_courts: Courts::Auto,
            teams_per_pool_advancement: Advancement::All,
        }
    }
}

/// Recorded when playoffs are generated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketsMetadata {
    pub advancement_per_pool: Advancement,
    pub bracket_size: usize,
    pub generated_at: DateTime<Utc>,
}

/// A tournament: roster, settings, and playoff flag. Matches live in the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub settings: TournamentSettings,
    pub teams: Vec<Team>,
    pub brackets_generated: bool,
    pub brackets_metadata: Option<BracketsMetadata>,
}

impl Tournament {
    /// Create a new tournament with no teams.
    pub fn new(name: impl Into<String>, settings: TournamentSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            settings,
            teams: Vec::new(),
            brackets_generated: false,
            brackets_metadata: None,
        }
    }

    /// Add a team. Names must be unique (case-insensitive) and non-blank.
    pub fn add_team(&mut self, team: Team) -> Result<TeamId, TournamentError> {
        let name = team.name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidInput("team name is empty".into()));
        }
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateTeamName(name.to_string()));
        }
        let team = Team {
            name: name.to_string(),
            ..team
        };
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    /// Flip a team's check-in status.
    pub fn set_checked_in(&mut self, team_id: TeamId, checked_in: bool) -> Result<(), TournamentError> {
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        team.checked_in = checked_in;
        Ok(())
    }
}
