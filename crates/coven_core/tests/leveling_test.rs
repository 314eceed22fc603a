use coven_core::{LEVEL_XP_STEP, LevelProgress};

#[test]
fn test_first_gain_promotes_new_member() {
    let update = LevelProgress::default().apply_xp(10);
    assert!(update.leveled_up);
    assert_eq!(update.progress, LevelProgress::new(0, 1));
}

#[test]
fn test_xp_accumulates_below_threshold() {
    let mut progress = LevelProgress::new(0, 1);
    for _ in 0..9 {
        let update = progress.apply_xp(10);
        assert!(!update.leveled_up);
        progress = update.progress;
    }
    assert_eq!(progress, LevelProgress::new(90, 1));

    let update = progress.apply_xp(10);
    assert!(update.leveled_up);
    assert_eq!(update.progress, LevelProgress::new(0, 2));
}

#[test]
fn test_excess_xp_is_discarded() {
    let update = LevelProgress::new(50, 1).apply_xp(1_000);
    assert!(update.leveled_up);
    assert_eq!(update.progress, LevelProgress::new(0, 2));
}

#[test]
fn test_threshold_scales_with_level() {
    assert_eq!(LevelProgress::new(0, 0).threshold(), 0);
    assert_eq!(LevelProgress::new(0, 3).threshold(), 3 * LEVEL_XP_STEP);
}

#[test]
fn test_negative_xp_clamps_to_zero() {
    let update = LevelProgress::new(20, 2).apply_xp(-50);
    assert!(!update.leveled_up);
    assert_eq!(update.progress, LevelProgress::new(0, 2));
}

#[test]
fn test_level_mutators_keep_other_field() {
    let progress = LevelProgress::new(40, 3);
    assert_eq!(progress.add_levels(2), LevelProgress::new(40, 5));
    assert_eq!(progress.add_levels(-10), LevelProgress::new(40, 0));
    assert_eq!(progress.with_level(7), LevelProgress::new(40, 7));
    assert_eq!(progress.with_xp(5), LevelProgress::new(5, 3));
}
