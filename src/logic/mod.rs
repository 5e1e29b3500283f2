//! Tournament business logic: pool planning, fixtures, referees, courts, standings, playoffs.

mod advance;
mod bracket;
mod court_time;
mod import;
mod playoffs;
mod pools;
mod referee;
mod results;
mod round_robin;
mod schedule;
mod seeding;
mod setup;
mod standings;

pub use advance::{advance_in_bracket, completed_playoff_winner, write_slot, AdvanceOutcome, SlotWrite};
pub use bracket::{
    bracket_position, bracket_size_for, build_bracket, next_slot, Bracket, PLAYOFF_COURTS,
};
pub use court_time::{assign_courts_and_times, CourtTimeParams, COURT_TRANSITION_MINUTES};
pub use import::import_teams_csv;
pub use playoffs::{
    advance_winner_to_next_round, generate_playoff_brackets, pool_completion_status,
    GeneratedBracket, PlayoffsGenerated,
};
pub use pools::{build_pools, matches_in_pool, plan_pools, pool_name, shuffle_teams};
pub use referee::assign_referees;
pub use results::{record_match_result, MatchScore, RecordedResult};
pub use round_robin::{generate_pool_matches, round_robin_rounds};
pub use schedule::{
    generate_pool_play_schedule, generate_pool_play_schedule_by_skill_level,
    partition_by_skill_level, required_courts, PoolPlaySchedule, SkillLevelPoolPlaySchedule,
    SkillLevelSchedule, MAX_COURTS, MAX_SLOT_MINUTES, OPEN_DIVISION,
};
pub use seeding::{seed_teams, PoolStandings, Seed};
pub use setup::{schedule_pool_play, ScheduleOptions, ScheduledPoolPlay};
pub use standings::{calculate_standings, check_pool_completion, compare_standings, PoolCompletion, PoolStatus};
