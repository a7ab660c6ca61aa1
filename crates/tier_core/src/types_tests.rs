use super::*;

#[test]
fn test_live_layout_bands() {
    let layout = TierLayout::default();
    assert_eq!(layout.slots_per_tier(), 12);
    assert_eq!(layout.band(0), 0..12);
    assert_eq!(layout.band(5), 60..72);
    // F tier holds the remainder
    assert_eq!(layout.band(6), 72..86);
}

#[test]
fn test_tier_for_position() {
    let layout = TierLayout::default();
    assert_eq!(layout.tier_for_position(Some(0)), Some(0));
    assert_eq!(layout.tier_for_position(Some(11)), Some(0));
    assert_eq!(layout.tier_for_position(Some(12)), Some(1));
    assert_eq!(layout.tier_for_position(Some(85)), Some(6));
    assert_eq!(layout.tier_for_position(Some(86)), None);
    assert_eq!(layout.tier_for_position(Some(-1)), None);
    assert_eq!(layout.tier_for_position(None), None);
}

#[test]
fn test_tier_labels() {
    let layout = TierLayout::default();
    assert_eq!(layout.tier_label_for_position(Some(30)), "B");
    assert_eq!(layout.tier_label_for_position(Some(84)), "F");
    assert_eq!(layout.tier_label_for_position(None), "U");
    assert_eq!(Tier::from_index(9), Tier::B);
}

#[test]
fn test_layout_serializes_as_total_only() {
    let layout = TierLayout::new(21);
    let json = serde_json::to_string(&layout).unwrap();
    assert_eq!(json, r#"{"total_slots":21}"#);

    let back: TierLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(back.band(6), 18..21);
}

#[test]
fn test_ids_are_distinct() {
    assert_ne!(SlotId::new(), SlotId::new());
}
