use super::*;
use crate::types::{CharacterId, TierLayout, UserId};

fn rivalry_with_contest() -> (Rivalry, Contest) {
    let roster: Vec<CharacterId> = (0..86).map(|_| CharacterId::new()).collect();
    let mut rivalry = Rivalry::new(UserId::new(), UserId::new());
    rivalry.begin(&roster, TierLayout::default());

    let slot_a = rivalry.ledger_a.as_ref().unwrap().slots[4].id;
    let slot_b = rivalry.ledger_b.as_ref().unwrap().slots[9].id;
    let contest = Contest::new(rivalry.id, slot_a, slot_b);
    (rivalry, contest)
}

#[test]
fn test_unresolved_contest_has_no_winner() {
    let (rivalry, contest) = rivalry_with_contest();
    assert!(!contest.is_resolved());
    assert_eq!(contest.winner_side(), None);
    assert!(contest.winner(&rivalry).is_none());
    assert!(contest.loser(&rivalry).is_none());
}

#[test]
fn test_positive_result_means_side_a_won() {
    let (rivalry, mut contest) = rivalry_with_contest();
    contest.resolve(2).unwrap();

    let winner = contest.winner(&rivalry).unwrap();
    let loser = contest.loser(&rivalry).unwrap();
    assert_eq!(winner.side, Side::A);
    assert_eq!(winner.user_id, rivalry.user_a_id);
    assert_eq!(winner.slot.id, contest.slot_a_id);
    assert_eq!(loser.side, Side::B);
    assert_eq!(loser.ledger.user_id, rivalry.user_b_id);
    assert_eq!(contest.stocks(), 2);
}

#[test]
fn test_negative_result_means_side_b_won() {
    let (_, mut contest) = rivalry_with_contest();
    contest.resolve(-3).unwrap();
    assert_eq!(contest.winner_side(), Some(Side::B));
    assert_eq!(contest.loser_side(), Some(Side::A));
    assert_eq!(contest.stocks(), 3);
}

#[test]
fn test_draw_has_no_winner() {
    let (_, mut contest) = rivalry_with_contest();
    contest.resolve(0).unwrap();
    assert!(contest.is_resolved());
    assert_eq!(contest.winner_side(), None);
}

#[test]
fn test_resolve_rejects_bad_input() {
    let (_, mut contest) = rivalry_with_contest();
    assert_eq!(contest.resolve(4), Err(Error::ResultOutOfRange(4)));
    assert_eq!(contest.resolve(-7), Err(Error::ResultOutOfRange(-7)));
    contest.resolve(1).unwrap();
    assert_eq!(contest.resolve(1), Err(Error::AlreadyResolved));
    assert_eq!(contest.result(), Some(1));
}

#[test]
fn test_bind_to_rivalry_finds_both_slots() {
    let (rivalry, contest) = rivalry_with_contest();
    let binding = contest.bind_to_rivalry(&rivalry).unwrap();
    assert_eq!(binding, ContestBinding { slot_a: 4, slot_b: 9 });
}

#[test]
fn test_bind_fails_for_foreign_slot() {
    let (rivalry, mut contest) = rivalry_with_contest();
    contest.slot_b_id = contest.slot_a_id;
    assert!(contest.bind_to_rivalry(&rivalry).is_none());
}

#[test]
fn test_bias_serializes_as_integer() {
    assert_eq!(serde_json::to_string(&Bias::WinnerDropped).unwrap(), "-1");
    assert_eq!(serde_json::from_str::<Bias>("1").unwrap(), Bias::LoserClimbed);
    assert!(serde_json::from_str::<Bias>("2").is_err());
}

#[test]
fn test_legacy_record_without_flags_deserializes() {
    let (_, mut contest) = rivalry_with_contest();
    contest.resolve(1).unwrap();
    let mut value = serde_json::to_value(&contest).unwrap();
    let object = value.as_object_mut().unwrap();
    object.remove("cycle_blocked");
    object.remove("prestige_cancelled");
    object.insert("bias".to_string(), serde_json::json!(-1));

    let restored: Contest = serde_json::from_value(value).unwrap();
    assert_eq!(restored.bias(), Some(Bias::WinnerDropped));
    assert_eq!(restored.cycle_blocked(), None);
    assert_eq!(restored.prestige_cancelled(), 0);
}
