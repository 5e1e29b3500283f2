//! Pool play and playoff scheduler: library with models, scheduling logic and storage.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    advance_winner_to_next_round, build_bracket, build_pools, calculate_standings,
    check_pool_completion, generate_playoff_brackets, generate_pool_matches,
    generate_pool_play_schedule, generate_pool_play_schedule_by_skill_level, import_teams_csv,
    plan_pools, pool_completion_status, record_match_result, schedule_pool_play, seed_teams,
    AdvanceOutcome, Bracket, MatchScore, ScheduleOptions,
};
pub use models::{
    eligible_teams, Advancement, BracketsMetadata, Courts, ErrorKind, Match, MatchId, MatchPhase,
    MatchStatus, Pool, PoolConfiguration, ScheduleWarning, Slot, Team, TeamId, TeamStanding,
    Tournament, TournamentError, TournamentId, TournamentSettings,
};
pub use store::{InMemoryStore, StoreError, TournamentStore};
