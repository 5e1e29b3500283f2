//! Data structures for pool play and playoffs: teams, pools, matches, tournament settings.

mod game;
mod pool;
mod team;
mod tournament;

pub use game::{Match, MatchId, MatchPhase, MatchStatus, Slot};
pub use pool::{Pool, PoolConfiguration, TeamStanding};
pub use team::{eligible_teams, Team, TeamId};
pub use tournament::{
    Advancement, BracketsMetadata, Courts, ErrorKind, ScheduleWarning, Tournament,
    TournamentError, TournamentId, TournamentSettings,
};
