//! Round-trip tests for standings adjustment and reversal
//!
//! Every adjustment must be undone exactly by `reverse` given the same
//! contest record, across stock counts, winners, tie-break choices and
//! starting standings, including the boundary at standing 0.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tier_core::{adjust, reverse, CharacterId, Contest, FixedTieBreak, Rivalry, TierLayout, UserId};

fn rivalry_at(a: u32, b: u32) -> (Rivalry, Contest) {
    let roster: Vec<CharacterId> = (0..86).map(|_| CharacterId::new()).collect();
    let mut rivalry = Rivalry::new(UserId::new(), UserId::new());
    rivalry.begin(&roster, TierLayout::default());
    rivalry.ledger_a.as_mut().unwrap().standing = Some(a);
    rivalry.ledger_b.as_mut().unwrap().standing = Some(b);

    let contest = Contest::new(
        rivalry.id,
        rivalry.ledger_a.as_ref().unwrap().slots[10].id,
        rivalry.ledger_b.as_ref().unwrap().slots[20].id,
    );
    (rivalry, contest)
}

// =============================================================================
// Exact inverse
// =============================================================================

#[test]
fn test_reverse_undoes_adjust_everywhere() {
    for a in 0..22 {
        for b in 0..22 {
            for result in [-3, -2, -1, 1, 2, 3] {
                for nudge in [Some(-1), Some(0), Some(1), None] {
                    let (mut rivalry, mut contest) = rivalry_at(a, b);
                    contest.resolve(result).unwrap();
                    let mut coin = FixedTieBreak(a % 2 == 0);

                    adjust(&mut rivalry, &mut contest, nudge, &mut coin).unwrap();
                    assert!(reverse(&mut rivalry, &contest));

                    assert_eq!(
                        rivalry.standings(),
                        (Some(a), Some(b)),
                        "start {}/{} result {} nudge {:?}",
                        a,
                        b,
                        result,
                        nudge
                    );
                }
            }
        }
    }
}

#[test]
fn test_reverse_undoes_random_tie_breaks() {
    let mut rng = StdRng::seed_from_u64(2024);
    for a in 1..15 {
        for result in [-3, -1, 1, 3] {
            let (mut rivalry, mut contest) = rivalry_at(a, 15 - a);
            contest.resolve(result).unwrap();
            adjust(&mut rivalry, &mut contest, None, &mut rng).unwrap();
            assert!(reverse(&mut rivalry, &contest));
            assert_eq!(rivalry.standings(), (Some(a), Some(15 - a)));
        }
    }
}

#[test]
fn test_loser_at_top_stays_at_zero() {
    for winner_start in 0..8 {
        for result in [-3, -2, -1, 1, 2, 3] {
            let (a, b) = if result > 0 { (winner_start, 0) } else { (0, winner_start) };
            let (mut rivalry, mut contest) = rivalry_at(a, b);
            contest.resolve(result).unwrap();

            adjust(&mut rivalry, &mut contest, Some(1), &mut FixedTieBreak(true)).unwrap();

            // every move the loser cannot make falls to the winner
            let expected_winner = Some(winner_start + result.unsigned_abs());
            let expected = if result > 0 {
                (expected_winner, Some(0))
            } else {
                (Some(0), expected_winner)
            };
            assert_eq!(rivalry.standings(), expected, "start {} result {}", winner_start, result);
        }
    }
}

// =============================================================================
// Records without the cycle flag
// =============================================================================

/// Strip the fields newer records carry, as an older store would have them.
fn as_legacy(contest: &Contest) -> Contest {
    let mut value = serde_json::to_value(contest).unwrap();
    let object = value.as_object_mut().unwrap();
    object.remove("cycle_blocked");
    object.remove("prestige_cancelled");
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_legacy_record_reverses_blocked_cycle() {
    let (mut rivalry, mut contest) = rivalry_at(2, 0);
    contest.resolve(2).unwrap();
    adjust(&mut rivalry, &mut contest, None, &mut FixedTieBreak(true)).unwrap();
    assert_eq!(rivalry.standings(), (Some(4), Some(0)));

    assert!(reverse(&mut rivalry, &as_legacy(&contest)));
    assert_eq!(rivalry.standings(), (Some(2), Some(0)));
}

#[test]
fn test_legacy_record_misreads_loser_starting_at_one() {
    let (mut rivalry, mut contest) = rivalry_at(2, 1);
    contest.resolve(2).unwrap();
    adjust(&mut rivalry, &mut contest, None, &mut FixedTieBreak(true)).unwrap();
    assert_eq!(rivalry.standings(), (Some(3), Some(0)));

    // without the flag this looks like a blocked cycle
    assert!(reverse(&mut rivalry, &as_legacy(&contest)));
    assert_eq!(rivalry.standings(), (Some(1), Some(0)));
}

#[test]
fn test_legacy_record_reverses_away_from_boundary() {
    let (mut rivalry, mut contest) = rivalry_at(4, 5);
    contest.resolve(-3).unwrap();
    adjust(&mut rivalry, &mut contest, Some(-1), &mut FixedTieBreak(true)).unwrap();

    assert!(reverse(&mut rivalry, &as_legacy(&contest)));
    assert_eq!(rivalry.standings(), (Some(4), Some(5)));
}
