//! Long-running session flows: many contests, persisted in between, then
//! undone one by one back to the starting state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rivalry::{Session, SessionConfig};
use tier_core::{Side, SlotSnapshot};

struct Checkpoint {
    standings: (Option<u32>, Option<u32>),
    slots_a: Vec<SlotSnapshot>,
    slots_b: Vec<SlotSnapshot>,
}

fn checkpoint(session: &Session) -> Checkpoint {
    Checkpoint {
        standings: session.rivalry.standings(),
        slots_a: session.rivalry.ledger(Side::A).unwrap().snapshot(),
        slots_b: session.rivalry.ledger(Side::B).unwrap().snapshot(),
    }
}

fn assert_matches(session: &Session, expected: &Checkpoint) {
    assert_eq!(session.rivalry.standings(), expected.standings);
    let a = session.rivalry.ledger(Side::A).unwrap();
    let b = session.rivalry.ledger(Side::B).unwrap();
    assert!(a.changed_slots_since(&expected.slots_a).is_empty());
    assert!(b.changed_slots_since(&expected.slots_b).is_empty());
}

fn random_result(rng: &mut StdRng) -> i32 {
    let stocks = rng.gen_range(1..=3);
    if rng.gen_bool(0.5) {
        stocks
    } else {
        -stocks
    }
}

fn random_nudge(rng: &mut StdRng) -> Option<i8> {
    match rng.gen_range(0..4) {
        0 => None,
        n => Some(n as i8 - 2),
    }
}

#[test]
fn test_undo_all_returns_to_start() {
    for seed in [1, 7, 42] {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = Session::start(
            "Ana",
            "Ben",
            Session::numbered_roster(86),
            SessionConfig::default(),
        );
        let mut checkpoints = Vec::new();

        for _ in 0..120 {
            checkpoints.push(checkpoint(&session));
            session.next_contest(&mut rng).unwrap();
            let result = random_result(&mut rng);
            let nudge = random_nudge(&mut rng);
            session.resolve_current(result, nudge, &mut rng).unwrap();
        }

        while let Some(expected) = checkpoints.pop() {
            session.undo_last().unwrap();
            assert_matches(&session, &expected);
        }
        assert!(session.history.is_empty());
        assert_eq!(session.rivalry.standings(), (Some(0), Some(0)));
    }
}

#[test]
fn test_counters_add_up() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut session = Session::start(
        "Ana",
        "Ben",
        Session::numbered_roster(86),
        SessionConfig::default(),
    );
    let mut wins_a = 0;

    for _ in 0..50 {
        session.next_contest(&mut rng).unwrap();
        let result = random_result(&mut rng);
        if result > 0 {
            wins_a += 1;
        }
        session.resolve_current(result, None, &mut rng).unwrap();
    }

    let a = session.rivalry.ledger(Side::A).unwrap();
    let b = session.rivalry.ledger(Side::B).unwrap();
    let contests: u32 = a.slots.iter().map(|s| s.contest_count).sum();
    let won: u32 = a.slots.iter().map(|s| s.win_count).sum();
    let lost_by_b: u32 = b.slots.iter().map(|s| s.contest_count - s.win_count).sum();

    assert_eq!(contests, 50);
    assert_eq!(won, wins_a);
    assert_eq!(lost_by_b, wins_a);
}

#[test]
fn test_persisted_session_resumes_and_undoes() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut session = Session::start(
        "Ana",
        "Ben",
        Session::numbered_roster(86),
        SessionConfig::default(),
    );
    let start = checkpoint(&session);

    for _ in 0..10 {
        session.next_contest(&mut rng).unwrap();
        let result = random_result(&mut rng);
        session.resolve_current(result, None, &mut rng).unwrap();
        session = Session::from_json(&session.to_json().unwrap()).unwrap();
    }
    assert_eq!(session.pending_changes(), 0);

    for _ in 0..10 {
        session.undo_last().unwrap();
        session = Session::from_json(&session.to_json().unwrap()).unwrap();
    }
    assert_matches(&session, &start);
}

#[test]
fn test_small_roster_from_config() {
    let config = SessionConfig::from_toml("total_slots = 21\nbench_rounds = 3\n").unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = Session::start("Ana", "Ben", Session::numbered_roster(21), config);

    for _ in 0..40 {
        session.next_contest(&mut rng).unwrap();
        let result = random_result(&mut rng);
        session.resolve_current(result, None, &mut rng).unwrap();
    }

    for side in [Side::A, Side::B] {
        let ledger = session.rivalry.ledger(side).unwrap();
        assert_eq!(ledger.layout.total_slots(), 21);
        assert_eq!(ledger.slots.len(), 21);
    }
    assert_eq!(session.history.len(), 40);
}
