//! Integration tests for playoffs: bracket building, seeding from pool play, and advancing
//! winners through the store.

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;
use tournament_scheduler_web::logic::{
    advance_in_bracket, next_slot, ScheduledPoolPlay, SlotWrite,
};
use tournament_scheduler_web::{
    advance_winner_to_next_round, build_bracket, generate_playoff_brackets, pool_completion_status,
    record_match_result, schedule_pool_play, AdvanceOutcome, Advancement, BracketsMetadata,
    InMemoryStore, Match, MatchId, MatchPhase, MatchScore, MatchStatus, ScheduleOptions,
    ScheduleWarning, Slot, StoreError, Team, TeamId, Tournament, TournamentError, TournamentId,
    TournamentSettings, TournamentStore,
};
use uuid::Uuid;

fn ids(n: usize) -> Vec<TeamId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

#[test]
fn six_seeds_fill_an_eight_bracket_with_two_byes() {
    let seeds = ids(6);
    let (bracket, warnings) = build_bracket(Uuid::new_v4(), None, &seeds);

    assert_eq!(bracket.bracket_size, 8);
    assert_eq!(bracket.total_rounds, 3);
    assert_eq!(bracket.len(), 7);
    assert_eq!(bracket.round(1).len(), 4);
    assert_eq!(bracket.round(2).len(), 2);
    assert_eq!(bracket.round(3).len(), 1);

    let byes: Vec<&Match> = bracket
        .round(1)
        .iter()
        .filter(|m| m.team1_id.is_none() || m.team2_id.is_none())
        .collect();
    assert_eq!(byes.len(), 2);
    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .all(|w| matches!(w, ScheduleWarning::FirstRoundBye { .. })));

    let m3 = bracket.get(1, 3).unwrap();
    assert_eq!((m3.team1_id, m3.team2_id), (Some(seeds[2]), Some(seeds[5])));
    let m4 = bracket.get(1, 4).unwrap();
    assert_eq!((m4.team1_id, m4.team2_id), (Some(seeds[3]), Some(seeds[4])));

    // Bye teams were moved straight into round 2.
    let r2 = bracket.get(2, 1).unwrap();
    assert_eq!((r2.team1_id, r2.team2_id), (Some(seeds[0]), Some(seeds[1])));
    assert_eq!(bracket.get(1, 1).unwrap().status, MatchStatus::Completed);
    assert_eq!(bracket.get(1, 1).unwrap().winner_id, Some(seeds[0]));

    let final_match = bracket.get(3, 1).unwrap();
    assert_eq!((final_match.team1_id, final_match.team2_id), (None, None));
    assert_eq!(final_match.scheduled_time, None);
    assert_eq!(final_match.bracket_position.as_deref(), Some("Final"));
}

#[test]
fn full_bracket_pairs_top_against_bottom_and_labels_rounds() {
    let seeds = ids(8);
    let (bracket, warnings) = build_bracket(Uuid::new_v4(), Some("Advanced"), &seeds);
    assert!(warnings.is_empty());

    for (i, m) in bracket.round(1).iter().enumerate() {
        assert_eq!(m.team1_id, Some(seeds[i]));
        assert_eq!(m.team2_id, Some(seeds[7 - i]));
        assert_eq!(m.bracket_position, Some(format!("Quarterfinal {}", i + 1)));
        assert_eq!(m.skill_level.as_deref(), Some("Advanced"));
        assert_eq!(m.phase, MatchPhase::Playoffs);
    }
    let semis: Vec<_> = bracket
        .round(2)
        .iter()
        .map(|m| m.bracket_position.clone().unwrap())
        .collect();
    assert_eq!(semis, vec!["Semifinal A", "Semifinal B"]);
    let courts: Vec<u32> = bracket.round(1).iter().map(|m| m.court_number).collect();
    assert_eq!(courts, vec![1, 2, 3, 4]);
}

#[test]
fn bracket_size_is_next_power_of_two() {
    for k in 1..=17usize {
        let (bracket, _) = build_bracket(Uuid::new_v4(), None, &ids(k));
        let size = k.next_power_of_two();
        assert_eq!(bracket.bracket_size, size, "k={k}");
        assert_eq!(bracket.len(), size - 1, "k={k}");
    }
    let (sixteen, _) = build_bracket(Uuid::new_v4(), None, &ids(16));
    assert_eq!(
        sixteen.get(1, 5).unwrap().bracket_position.as_deref(),
        Some("Round 1 - Match 5")
    );
}

#[test]
fn winners_move_to_half_the_match_number() {
    for m in 1..=8 {
        let (round, number, slot) = next_slot(1, m);
        assert_eq!(round, 2);
        assert_eq!(number, (m + 1) / 2);
        assert_eq!(slot, if m % 2 == 1 { Slot::Team1 } else { Slot::Team2 });
    }
}

#[test]
fn advancing_in_memory_fills_slots_then_crowns_champion() {
    let seeds = ids(4);
    let (mut bracket, _) = build_bracket(Uuid::new_v4(), None, &seeds);

    let mut semi2 = bracket.get(1, 2).unwrap().clone();
    semi2.record_result(50, 40, 2, 1).unwrap();
    let outcome = advance_in_bracket(&mut bracket, &semi2).unwrap();
    assert!(matches!(
        outcome,
        AdvanceOutcome::Advanced { slot: Slot::Team2, team_id, .. } if team_id == seeds[1]
    ));

    let mut semi1 = bracket.get(1, 1).unwrap().clone();
    semi1.record_result(50, 40, 2, 0).unwrap();
    advance_in_bracket(&mut bracket, &semi1).unwrap();
    let final_match = bracket.get(2, 1).unwrap().clone();
    assert_eq!((final_match.team1_id, final_match.team2_id), (Some(seeds[0]), Some(seeds[1])));

    let mut finished = final_match;
    finished.record_result(30, 50, 0, 2).unwrap();
    assert_eq!(
        advance_in_bracket(&mut bracket, &finished).unwrap(),
        AdvanceOutcome::Champion { team_id: seeds[1] }
    );
}

#[test]
fn open_match_does_not_advance() {
    let (mut bracket, _) = build_bracket(Uuid::new_v4(), None, &ids(4));
    let open = bracket.get(1, 1).unwrap().clone();
    assert_eq!(
        advance_in_bracket(&mut bracket, &open).unwrap(),
        AdvanceOutcome::NotReady
    );
    assert_eq!(bracket.get(2, 1).unwrap().team1_id, None);
}

#[test]
fn single_team_needs_no_bracket() {
    let (bracket, warnings) = build_bracket(Uuid::new_v4(), None, &ids(1));
    assert!(bracket.is_empty());
    assert!(warnings.is_empty());
}

// ---------------------------------------------------------------------------
// Store-backed flow
// ---------------------------------------------------------------------------

fn store_with_tournament(team_names: &[(&str, Option<&str>)]) -> (InMemoryStore, Tournament) {
    let settings = TournamentSettings::new(Utc.with_ymd_and_hms(2026, 6, 13, 9, 0, 0).unwrap());
    let mut t = Tournament::new("Summer Open", settings);
    for (name, level) in team_names {
        let team = match level {
            Some(level) => Team::with_skill_level(*name, *level),
            None => Team::new(*name),
        };
        t.add_team(team).unwrap();
    }
    let store = InMemoryStore::new();
    store.save_tournament(t.clone()).unwrap();
    (store, t)
}

fn schedule(store: &InMemoryStore, id: Uuid, by_skill_level: bool) -> ScheduledPoolPlay {
    let options = ScheduleOptions {
        by_skill_level,
        shuffle: false,
    };
    schedule_pool_play(store, id, options, &mut StdRng::seed_from_u64(7)).unwrap()
}

/// Team 1 (the earlier-listed pool member) wins every pool match 2-0.
fn finish_pool_play(store: &InMemoryStore, id: Uuid) {
    for m in store.matches(id, Some(MatchPhase::PoolPlay)).unwrap() {
        let score = MatchScore {
            team1_score: 50,
            team2_score: 30,
            sets_won_team1: 2,
            sets_won_team2: 0,
        };
        record_match_result(store, m.id, score).unwrap();
    }
}

fn twelve_teams() -> Vec<(String, Option<&'static str>)> {
    (0..12).map(|i| (format!("Team {i}"), None)).collect()
}

fn as_refs<'a>(v: &'a [(String, Option<&'static str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    v.iter().map(|(n, l)| (n.as_str(), *l)).collect()
}

#[test]
fn three_pools_top_two_make_an_eight_bracket() {
    let names = twelve_teams();
    let (store, t) = store_with_tournament(&as_refs(&names));
    let scheduled = schedule(&store, t.id, false);
    assert_eq!(scheduled.pools.len(), 3);
    assert_eq!(scheduled.matches.len(), 18);

    finish_pool_play(&store, t.id);
    assert!(pool_completion_status(&store, t.id).unwrap().ready_for_brackets);

    let generated = generate_playoff_brackets(&store, t.id, Some(Advancement::Top(2))).unwrap();
    assert_eq!(generated.brackets.len(), 1);
    let bracket = &generated.brackets[0];
    assert_eq!(bracket.seeds.len(), 6);
    assert_eq!(bracket.bracket_size, 8);
    assert_eq!(bracket.matches.len(), 7);
    assert_eq!(generated.warnings.len(), 2);
    assert_eq!(generated.metadata.bracket_size, 8);
    assert_eq!(generated.metadata.advancement_per_pool, Advancement::Top(2));

    // Pool winners (first member of each pool) seed first, in pool order.
    let seeded: Vec<_> = bracket.seeds.iter().map(|s| s.team_id).collect();
    let pool_firsts: Vec<_> = scheduled.pools.iter().map(|p| p.teams[0].id).collect();
    assert_eq!(&seeded[..3], pool_firsts.as_slice());

    let stored = store.matches(t.id, Some(MatchPhase::Playoffs)).unwrap();
    assert_eq!(stored.len(), 7);
    let first_round_byes = stored
        .iter()
        .filter(|m| m.round_number == 1 && (m.team1_id.is_none() || m.team2_id.is_none()))
        .count();
    assert_eq!(first_round_byes, 2);

    let tournament = store.tournament(t.id).unwrap().unwrap();
    assert!(tournament.brackets_generated);
    assert_eq!(tournament.brackets_metadata, Some(generated.metadata.clone()));

    assert_eq!(
        generate_playoff_brackets(&store, t.id, None).unwrap_err(),
        TournamentError::BracketsAlreadyGenerated
    );
}

#[test]
fn odd_first_round_winner_lands_in_team1_of_next_match() {
    let names = twelve_teams();
    let (store, t) = store_with_tournament(&as_refs(&names));
    schedule(&store, t.id, false);
    finish_pool_play(&store, t.id);
    generate_playoff_brackets(&store, t.id, Some(Advancement::Top(2))).unwrap();

    let match3 = store
        .find_playoff_match(t.id, None, 1, 3)
        .unwrap()
        .unwrap();
    let score = MatchScore {
        team1_score: 40,
        team2_score: 50,
        sets_won_team1: 1,
        sets_won_team2: 2,
    };
    let recorded = record_match_result(&store, match3.id, score).unwrap();
    let winner = match3.team2_id.unwrap();
    assert_eq!(recorded.game.winner_id, Some(winner));
    assert!(matches!(
        recorded.advancement,
        Some(AdvanceOutcome::Advanced { slot: Slot::Team1, team_id, .. }) if team_id == winner
    ));

    let next = store.find_playoff_match(t.id, None, 2, 2).unwrap().unwrap();
    assert_eq!(next.team1_id, Some(winner));
    assert_eq!(next.team2_id, None);

    // Repeat delivery is a no-op.
    assert!(matches!(
        advance_winner_to_next_round(&store, match3.id).unwrap(),
        AdvanceOutcome::AlreadyAdvanced { .. }
    ));
}

#[test]
fn conflicting_slot_is_reported_and_source_stays_completed() {
    let names = twelve_teams();
    let (store, t) = store_with_tournament(&as_refs(&names));
    schedule(&store, t.id, false);
    finish_pool_play(&store, t.id);
    generate_playoff_brackets(&store, t.id, Some(Advancement::Top(2))).unwrap();

    let match4 = store.find_playoff_match(t.id, None, 1, 4).unwrap().unwrap();
    let next = store.find_playoff_match(t.id, None, 2, 2).unwrap().unwrap();
    let intruder = Uuid::new_v4();
    store.set_team_slot(next.id, Slot::Team2, intruder).unwrap();

    let score = MatchScore {
        team1_score: 50,
        team2_score: 45,
        sets_won_team1: 2,
        sets_won_team2: 1,
    };
    let recorded = record_match_result(&store, match4.id, score).unwrap();
    assert!(recorded.advancement.is_none());
    assert!(recorded.advancement_error.is_some());

    assert!(matches!(
        advance_winner_to_next_round(&store, match4.id),
        Err(TournamentError::SlotConflict { existing, slot: Slot::Team2, .. }) if existing == intruder
    ));
    let source = store.get_match(match4.id).unwrap().unwrap();
    assert_eq!(source.status, MatchStatus::Completed);
    let next = store.get_match(next.id).unwrap().unwrap();
    assert_eq!(next.team2_id, Some(intruder));
}

#[test]
fn completing_the_final_is_a_no_op() {
    let names: Vec<_> = (0..4).map(|i| (format!("Team {i}"), None)).collect();
    let (store, t) = store_with_tournament(&as_refs(&names));
    schedule(&store, t.id, false);
    finish_pool_play(&store, t.id);
    generate_playoff_brackets(&store, t.id, Some(Advancement::Top(2))).unwrap();

    let final_match = store.find_playoff_match(t.id, None, 1, 1).unwrap().unwrap();
    assert_eq!(final_match.bracket_position.as_deref(), Some("Final"));
    let recorded = record_match_result(
        &store,
        final_match.id,
        MatchScore {
            sets_won_team1: 2,
            ..MatchScore::default()
        },
    )
    .unwrap();
    assert!(matches!(recorded.advancement, Some(AdvanceOutcome::Champion { .. })));
}

#[test]
fn brackets_wait_for_every_pool() {
    let names = twelve_teams();
    let (store, t) = store_with_tournament(&as_refs(&names));

    assert_eq!(
        generate_playoff_brackets(&store, t.id, None).unwrap_err(),
        TournamentError::NoPoolPlayMatches
    );

    schedule(&store, t.id, false);
    let first = store.matches(t.id, Some(MatchPhase::PoolPlay)).unwrap()[0].clone();
    record_match_result(
        &store,
        first.id,
        MatchScore {
            sets_won_team1: 2,
            ..MatchScore::default()
        },
    )
    .unwrap();

    match generate_playoff_brackets(&store, t.id, None) {
        Err(TournamentError::PoolsIncomplete { pools }) => assert_eq!(pools, vec!["A", "B", "C"]),
        other => panic!("expected PoolsIncomplete, got {other:?}"),
    }
    assert!(store.matches(t.id, Some(MatchPhase::Playoffs)).unwrap().is_empty());

    let missing = Uuid::new_v4();
    assert_eq!(
        generate_playoff_brackets(&store, missing, None).unwrap_err(),
        TournamentError::TournamentNotFound(missing)
    );
}

#[test]
fn rescheduling_is_refused_after_results() {
    let names = twelve_teams();
    let (store, t) = store_with_tournament(&as_refs(&names));
    schedule(&store, t.id, false);
    // Before any result the schedule can be regenerated and replaces the old one.
    schedule(&store, t.id, false);
    assert_eq!(store.matches(t.id, Some(MatchPhase::PoolPlay)).unwrap().len(), 18);

    finish_pool_play(&store, t.id);
    let again = schedule_pool_play(&store, t.id, ScheduleOptions::default(), &mut StdRng::seed_from_u64(1));
    assert!(matches!(again, Err(TournamentError::InvalidState(_))));
}

#[test]
fn unchecked_teams_are_left_out() {
    let names: Vec<_> = (0..6).map(|i| (format!("Team {i}"), None)).collect();
    let (store, mut t) = store_with_tournament(&as_refs(&names));
    let absent = t.teams[5].id;
    t.set_checked_in(absent, false).unwrap();
    store.save_tournament(t.clone()).unwrap();

    let scheduled = schedule(&store, t.id, false);
    assert_eq!(scheduled.pools.iter().map(|p| p.teams.len()).sum::<usize>(), 5);
    assert!(scheduled
        .matches
        .iter()
        .all(|m| !m.involves(absent) && m.referee_team_id != Some(absent)));
}

#[test]
fn each_skill_level_gets_its_own_bracket() {
    let mut names: Vec<(String, Option<&'static str>)> =
        (0..5).map(|i| (format!("Adv {i}"), Some("Advanced"))).collect();
    names.extend((0..3).map(|i| (format!("Rec {i}"), Some("Rec"))));
    let (store, t) = store_with_tournament(&as_refs(&names));

    let scheduled = schedule(&store, t.id, true);
    assert_eq!(scheduled.required_courts, Some(3));
    finish_pool_play(&store, t.id);

    let generated = generate_playoff_brackets(&store, t.id, Some(Advancement::All)).unwrap();
    let levels: Vec<_> = generated
        .brackets
        .iter()
        .map(|b| (b.skill_level.as_deref(), b.bracket_size))
        .collect();
    assert_eq!(levels, vec![(Some("Advanced"), 8), (Some("Rec"), 4)]);
    assert_eq!(generated.metadata.bracket_size, 8);

    let rec_final = store
        .find_playoff_match(t.id, Some("Rec"), 2, 1)
        .unwrap()
        .unwrap();
    // Rec top seed had a bye.
    assert!(rec_final.team1_id.is_some());
    assert!(store
        .find_playoff_match(t.id, Some("Advanced"), 3, 1)
        .unwrap()
        .is_some());
}

#[test]
fn advancing_unknown_match_is_not_found() {
    let store = InMemoryStore::new();
    let id = Uuid::new_v4();
    assert_eq!(
        advance_winner_to_next_round(&store, id).unwrap_err(),
        TournamentError::MatchNotFound(id)
    );
}

// ---------------------------------------------------------------------------
// Concurrent callers
// ---------------------------------------------------------------------------

/// Store whose reads are slow, so callers racing each other all read before anyone writes.
struct SlowStore {
    inner: InMemoryStore,
    delay: Duration,
}

impl SlowStore {
    fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            delay: Duration::from_millis(50),
        }
    }
}

impl TournamentStore for SlowStore {
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        thread::sleep(self.delay);
        self.inner.tournament(id)
    }

    fn save_tournament(&self, tournament: Tournament) -> Result<(), StoreError> {
        self.inner.save_tournament(tournament)
    }

    fn update_tournament(
        &self,
        id: TournamentId,
        change: &mut dyn FnMut(&mut Tournament) -> Result<(), TournamentError>,
    ) -> Result<Tournament, TournamentError> {
        thread::sleep(self.delay);
        self.inner.update_tournament(id, change)
    }

    fn matches(
        &self,
        tournament_id: TournamentId,
        phase: Option<MatchPhase>,
    ) -> Result<Vec<Match>, StoreError> {
        thread::sleep(self.delay);
        self.inner.matches(tournament_id, phase)
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        thread::sleep(self.delay);
        self.inner.get_match(id)
    }

    fn update_match(
        &self,
        id: MatchId,
        change: &mut dyn FnMut(&mut Match) -> Result<(), TournamentError>,
    ) -> Result<Match, TournamentError> {
        thread::sleep(self.delay);
        self.inner.update_match(id, change)
    }

    fn replace_pool_play(
        &self,
        tournament_id: TournamentId,
        matches: &[Match],
    ) -> Result<usize, TournamentError> {
        self.inner.replace_pool_play(tournament_id, matches)
    }

    fn insert_playoffs(
        &self,
        tournament_id: TournamentId,
        matches: &[Match],
        metadata: BracketsMetadata,
    ) -> Result<(), TournamentError> {
        self.inner.insert_playoffs(tournament_id, matches, metadata)
    }

    fn find_playoff_match(
        &self,
        tournament_id: TournamentId,
        skill_level: Option<&str>,
        round_number: u32,
        match_number: u32,
    ) -> Result<Option<Match>, StoreError> {
        thread::sleep(self.delay);
        self.inner
            .find_playoff_match(tournament_id, skill_level, round_number, match_number)
    }

    fn set_team_slot(
        &self,
        match_id: MatchId,
        slot: Slot,
        team_id: TeamId,
    ) -> Result<SlotWrite, StoreError> {
        self.inner.set_team_slot(match_id, slot, team_id)
    }
}

fn sets(team1: u32, team2: u32) -> MatchScore {
    MatchScore {
        sets_won_team1: team1,
        sets_won_team2: team2,
        ..MatchScore::default()
    }
}

/// Run `work` on two threads released together; results in thread order.
fn race<T: Send>(work: [&(dyn Fn() -> T + Sync); 2]) -> Vec<T> {
    let barrier = Barrier::new(work.len());
    thread::scope(|s| {
        let handles: Vec<_> = work
            .iter()
            .map(|job| {
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    job()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// Eight teams through pool play; every pool team advances into a full eight bracket.
fn eight_team_playoffs() -> (SlowStore, Tournament) {
    let names: Vec<_> = (0..8).map(|i| (format!("Team {i}"), None)).collect();
    let (store, t) = store_with_tournament(&as_refs(&names));
    schedule(&store, t.id, false);
    finish_pool_play(&store, t.id);
    generate_playoff_brackets(&store, t.id, Some(Advancement::All)).unwrap();
    (SlowStore::new(store), t)
}

#[test]
fn concurrent_bracket_generation_stores_one_bracket() {
    let names = twelve_teams();
    let (store, t) = store_with_tournament(&as_refs(&names));
    schedule(&store, t.id, false);
    finish_pool_play(&store, t.id);
    let store = SlowStore::new(store);

    let generate = || generate_playoff_brackets(&store, t.id, Some(Advancement::Top(2)));
    let results = race([&generate, &generate]);

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(TournamentError::BracketsAlreadyGenerated))));
    assert_eq!(store.matches(t.id, Some(MatchPhase::Playoffs)).unwrap().len(), 7);
}

#[test]
fn racing_result_entries_complete_a_match_once() {
    let names: Vec<_> = (0..4).map(|i| (format!("Team {i}"), None)).collect();
    let (store, t) = store_with_tournament(&as_refs(&names));
    schedule(&store, t.id, false);
    let store = SlowStore::new(store);
    let game = store.matches(t.id, Some(MatchPhase::PoolPlay)).unwrap()[0].clone();

    let home_win = || record_match_result(&store, game.id, sets(2, 0));
    let away_win = || record_match_result(&store, game.id, sets(0, 2));
    let results = race([&home_win, &away_win]);

    let accepted: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(accepted.len(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(TournamentError::InvalidState(_)))));

    let stored = store.get_match(game.id).unwrap().unwrap();
    assert_eq!(stored.status, MatchStatus::Completed);
    assert_eq!(stored.winner_id, accepted[0].game.winner_id);
}

#[test]
fn sibling_matches_finishing_together_fill_both_slots() {
    let (store, t) = eight_team_playoffs();
    let first = store.find_playoff_match(t.id, None, 1, 1).unwrap().unwrap();
    let second = store.find_playoff_match(t.id, None, 1, 2).unwrap().unwrap();

    let finish_first = || record_match_result(&store, first.id, sets(2, 1));
    let finish_second = || record_match_result(&store, second.id, sets(2, 0));
    for recorded in race([&finish_first, &finish_second]) {
        assert!(matches!(
            recorded.unwrap().advancement,
            Some(AdvanceOutcome::Advanced { .. })
        ));
    }

    let semi = store.find_playoff_match(t.id, None, 2, 1).unwrap().unwrap();
    assert_eq!(semi.team1_id, first.team1_id);
    assert_eq!(semi.team2_id, second.team1_id);
}

#[test]
fn repeated_advancement_is_applied_once() {
    let (store, t) = eight_team_playoffs();
    let first = store.find_playoff_match(t.id, None, 1, 1).unwrap().unwrap();
    store
        .update_match(first.id, &mut |m| m.record_result(0, 0, 0, 2))
        .unwrap();

    let deliver = || advance_winner_to_next_round(&store, first.id);
    let outcomes: Vec<_> = race([&deliver, &deliver])
        .into_iter()
        .map(Result::unwrap)
        .collect();

    let advanced = outcomes
        .iter()
        .filter(|o| matches!(o, AdvanceOutcome::Advanced { .. }))
        .count();
    let repeated = outcomes
        .iter()
        .filter(|o| matches!(o, AdvanceOutcome::AlreadyAdvanced { .. }))
        .count();
    assert_eq!((advanced, repeated), (1, 1));

    let semi = store.find_playoff_match(t.id, None, 2, 1).unwrap().unwrap();
    assert_eq!(semi.team1_id, first.team2_id);
}

#[test]
fn concurrent_roster_edits_are_all_kept() {
    let (store, t) = store_with_tournament(&[("Early", None)]);
    let store = SlowStore::new(store);

    let add = |name: &str| {
        store.update_tournament(t.id, &mut |tournament| {
            tournament.add_team(Team::new(name)).map(|_| ())
        })
    };
    let add_north = || add("North");
    let add_south = || add("South");
    for result in race([&add_north, &add_south]) {
        result.unwrap();
    }

    let roster: Vec<_> = store
        .tournament(t.id)
        .unwrap()
        .unwrap()
        .teams
        .into_iter()
        .map(|team| team.name)
        .collect();
    assert_eq!(roster.len(), 3);
    assert!(roster.contains(&"North".to_string()));
    assert!(roster.contains(&"South".to_string()));
}
