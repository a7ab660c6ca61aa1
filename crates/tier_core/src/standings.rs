//! Standings adjustment after a contest, and its exact inverse.
//!
//! Every two stocks of margin form a *cycle*: the loser climbs one tier and
//! the winner drops one. A leftover odd stock is an *extra* move made by
//! only one of them, chosen by a tie-break. Winners move down the tiers on
//! purpose: a lower tier hands them stronger characters next time, so the
//! standings converge toward an even matchup.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contest::{Bias, Contest};
use crate::ledger::RankingLedger;
use crate::rivalry::{Rivalry, Side};
use crate::types::TIER_COUNT;

/// Stocks consumed by one cycle of paired movement.
const STOCKS_PER_CYCLE: u32 = 2;

/// Source of the fair coin used when no nudge is given.
///
/// Any `rand::Rng` qualifies; tests can supply a fixed answer instead.
pub trait TieBreaker {
    /// Returns true when the loser should be preferred for the extra move.
    fn prefer_loser(&mut self) -> bool;
}

impl<R: Rng + ?Sized> TieBreaker for R {
    fn prefer_loser(&mut self) -> bool {
        self.gen_bool(0.5)
    }
}

/// Always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedTieBreak(pub bool);

impl TieBreaker for FixedTieBreak {
    fn prefer_loser(&mut self) -> bool {
        self.0
    }
}

/// Summary of one forward adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub winner: Side,
    pub stocks: u32,
    /// Standings before and after, `(A, B)`
    pub before: (Option<u32>, Option<u32>),
    pub after: (Option<u32>, Option<u32>),
    pub bias: Bias,
    pub cycle_blocked: Option<bool>,
    pub prestige_cancelled: u32,
}

/// Move both ledgers' standings according to a resolved contest.
///
/// `nudge` overrides the coin for the extra move: positive prefers moving
/// the loser up, zero or negative prefers moving the winner down. Returns
/// `None` without touching anything when the contest is unresolved, drawn,
/// not bound to this rivalry, or a ledger is missing.
pub fn adjust(
    rivalry: &mut Rivalry,
    contest: &mut Contest,
    nudge: Option<i8>,
    coin: &mut impl TieBreaker,
) -> Option<Adjustment> {
    let winner_side = contest.winner_side()?;
    contest.bind_to_rivalry(rivalry)?;

    let before = rivalry.standings();
    let stocks = contest.stocks();
    let cycles = stocks / STOCKS_PER_CYCLE;
    let has_extra = stocks % STOCKS_PER_CYCLE != 0;

    let (winner, loser) = rivalry.ledgers_mut(winner_side)?;

    let mut cycle_blocked = None;
    for _ in 0..cycles {
        if loser.move_up_a_tier() {
            winner.move_down_a_tier();
            cycle_blocked.get_or_insert(false);
        } else {
            // loser is already at the top, so the winner moves for both
            winner.move_down_a_tier();
            winner.move_down_a_tier();
            cycle_blocked = Some(true);
        }
    }

    let bias = if has_extra {
        extra_move(winner, loser, nudge, coin)
    } else {
        Bias::Even
    };

    let (a, b) = rivalry.ledgers_mut(Side::A)?;
    let prestige_cancelled = cancel_shared_prestige(a, b);

    contest.record_adjustment(bias, cycle_blocked, prestige_cancelled);

    let adjustment = Adjustment {
        winner: winner_side,
        stocks,
        before,
        after: rivalry.standings(),
        bias,
        cycle_blocked,
        prestige_cancelled,
    };
    debug!(contest = %contest.id, ?adjustment, "adjusted standings");
    Some(adjustment)
}

/// Undo `adjust` for the same contest, restoring both standings.
///
/// Returns false without touching anything under the same conditions in
/// which `adjust` would have been a no-op.
pub fn reverse(rivalry: &mut Rivalry, contest: &Contest) -> bool {
    let Some(winner_side) = contest.winner_side() else {
        return false;
    };
    if contest.bind_to_rivalry(rivalry).is_none() {
        return false;
    }
    let before = rivalry.standings();
    let stocks = contest.stocks();

    {
        let Some((a, b)) = rivalry.ledgers_mut(Side::A) else {
            return false;
        };
        restore_shared_prestige(a, b, contest.prestige_cancelled());
    }

    let Some((winner, loser)) = rivalry.ledgers_mut(winner_side) else {
        return false;
    };

    if stocks % STOCKS_PER_CYCLE != 0 {
        match contest.bias() {
            Some(Bias::LoserClimbed) => {
                loser.move_down_a_tier();
            }
            Some(Bias::WinnerDropped) => {
                winner.move_up_a_tier();
            }
            Some(Bias::Even) | None => {}
        }
    }

    for _ in 0..stocks / STOCKS_PER_CYCLE {
        // older records carry no flag; a loser sitting at 0 is the best guess
        let blocked = contest
            .cycle_blocked()
            .unwrap_or_else(|| loser.standing == Some(0));
        if blocked {
            winner.move_up_a_tier();
            winner.move_up_a_tier();
        } else {
            loser.move_down_a_tier();
            winner.move_up_a_tier();
        }
    }

    debug!(
        contest = %contest.id,
        ?before,
        after = ?rivalry.standings(),
        "reversed standings"
    );
    true
}

/// Make the odd stock's move and report who made it.
fn extra_move(
    winner: &mut RankingLedger,
    loser: &mut RankingLedger,
    nudge: Option<i8>,
    coin: &mut impl TieBreaker,
) -> Bias {
    let tiers = TIER_COUNT as u32;
    let winner_at_worst_tier = winner.standing.is_some_and(|s| (s + 1) % tiers == 0);
    let loser_at_best_tier = loser.standing.is_some_and(|s| s % tiers == 0);
    let prefer_loser = !loser_at_best_tier
        && match nudge {
            Some(n) => n > 0,
            None => coin.prefer_loser(),
        };

    if (winner_at_worst_tier || prefer_loser) && loser.move_up_a_tier() {
        Bias::LoserClimbed
    } else {
        winner.move_down_a_tier();
        Bias::WinnerDropped
    }
}

/// Strip prestige cycles both ledgers share, so only the relative gap remains.
fn cancel_shared_prestige(a: &mut RankingLedger, b: &mut RankingLedger) -> u32 {
    let tiers = TIER_COUNT as u32;
    let mut cancelled = 0;
    while a.prestige() > 0 && b.prestige() > 0 {
        for ledger in [&mut *a, &mut *b] {
            ledger.standing = ledger.standing.map(|s| s.saturating_sub(tiers));
        }
        cancelled += 1;
    }
    cancelled
}

fn restore_shared_prestige(a: &mut RankingLedger, b: &mut RankingLedger, cycles: u32) {
    let shift = cycles * TIER_COUNT as u32;
    for ledger in [a, b] {
        ledger.standing = ledger.standing.map(|s| s + shift);
    }
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;
