use super::*;
use crate::types::{CharacterId, RivalryId, TierLayout, UserId};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn ledger(standing: u32, placed: usize) -> RankingLedger {
    let mut ledger = RankingLedger::new(
        RivalryId::new(),
        UserId::new(),
        (0..86).map(|_| CharacterId::new()),
        TierLayout::default(),
    );
    ledger.standing = Some(standing);
    for (index, slot) in ledger.slots.iter_mut().enumerate().take(placed) {
        slot.position = Some(index as i32);
    }
    ledger
}

fn band_ids(ledger: &RankingLedger) -> Vec<SlotId> {
    ledger.eligible_slots().iter().map(|slot| slot.id).collect()
}

#[test]
fn test_avoids_current_and_recent_slots() {
    let ledger = ledger(2, 86);
    let band = band_ids(&ledger);
    let current = band[0];
    let recent = vec![band[1], band[2], band[3]];
    let context = SamplingContext::new(Some(current), &recent);
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..100 {
        let slot = ledger.sample_contest_slot(&mut rng, &context).unwrap();
        assert!((24..36).contains(&slot.position.unwrap()));
        assert_ne!(slot.id, current);
        assert!(!recent.contains(&slot.id));
    }
}

#[test]
fn test_bench_shrinks_until_a_candidate_remains() {
    let ledger = ledger(1, 86);
    let band = band_ids(&ledger);
    // every band slot played recently; the two oldest come back first
    let recent = band.clone();
    let context = SamplingContext::new(None, &recent);
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..50 {
        let slot = ledger.sample_contest_slot(&mut rng, &context).unwrap();
        assert!(slot.id == band[10] || slot.id == band[11]);
    }
}

#[test]
fn test_short_bench_leaves_candidates() {
    let ledger = ledger(0, 86);
    let band = band_ids(&ledger);
    let current = band[5];
    let context = SamplingContext {
        current_slot: Some(current),
        recent_slots: &band,
        bench_rounds: 4,
        bench_step: 5,
    };
    let mut rng = StdRng::seed_from_u64(3);

    // a four-round bench still leaves candidates
    let slot = ledger.sample_contest_slot(&mut rng, &context).unwrap();
    assert!(!band[..4].contains(&slot.id));
    assert_ne!(slot.id, current);
}

#[test]
fn test_prefers_unplaced_characters_while_band_has_room() {
    let ledger = ledger(0, 5);
    let current = ledger.slots[40].id;
    let context = SamplingContext::new(Some(current), &[]);
    let mut rng = StdRng::seed_from_u64(4);

    for _ in 0..100 {
        let slot = ledger.sample_contest_slot(&mut rng, &context).unwrap();
        assert!(!slot.is_positioned());
        assert_ne!(slot.id, current);
    }
}

#[test]
fn test_full_band_ignores_unplaced_characters() {
    let mut ledger = ledger(1, 86);
    // unplace one slot from the S band; the A band is still full
    ledger.slots[3].position = None;
    let context = SamplingContext::new(None, &[]);
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..50 {
        let slot = ledger.sample_contest_slot(&mut rng, &context).unwrap();
        assert!((12..24).contains(&slot.position.unwrap()));
    }
}

#[test]
fn test_empty_band_samples_whole_roster() {
    let mut ledger = ledger(3, 86);
    for slot in ledger.slots.iter_mut().filter(|s| (36..48).contains(&s.position.unwrap())) {
        slot.position = Some(slot.position.unwrap() + 100);
    }
    let context = SamplingContext::new(None, &[]);
    let mut rng = StdRng::seed_from_u64(6);
    assert!(ledger.sample_contest_slot(&mut rng, &context).is_some());
}
