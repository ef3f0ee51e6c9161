//! Tests for boost-aware timer calculations
//!
//! Covers the baseline identities, blanket non-stacking, targeted isolation,
//! forward projection and progress clamping.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use super::calc::{boosted_progress_fraction, effective_completion_date, effective_remaining_seconds};
use super::{ActiveBoost, BoostKind};
use crate::upgrade::Upgrade;
use clashdash_types::UpgradeCategory;

fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

/// One-hour home village upgrade starting at t(0)
fn hour_upgrade() -> Upgrade {
    Upgrade::new(1000001, "Archer Tower", 12, UpgradeCategory::HomeVillage, t(0), t(3_600))
}

fn blanket(start: i64, end: i64) -> ActiveBoost {
    ActiveBoost::new(BoostKind::BuilderPotion, t(start), t(end)).with_bonus(1.0)
}

fn home_category_boost(start: i64, end: i64, bonus: f64) -> ActiveBoost {
    ActiveBoost::new(
        BoostKind::CategoryWide {
            category: UpgradeCategory::HomeVillage,
        },
        t(start),
        t(end),
    )
    .with_bonus(bonus)
}

// ─────────────────────────────────────────────────────────────────────────────
// Remaining time
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_no_boosts_matches_raw_remaining() {
    let upgrade = hour_upgrade();
    for offset in [-600, 0, 1, 1_800, 3_599, 3_600, 7_200] {
        let expected = (3_600 - offset).max(0) as f64;
        assert_eq!(effective_remaining_seconds(&upgrade, &[], t(offset)), expected);
        assert_eq!(effective_completion_date(&upgrade, &[], t(offset)), t(3_600));
    }
}

#[test]
fn test_full_coverage_blanket_completes_early() {
    let upgrade = hour_upgrade();
    let boosts = vec![blanket(0, 1_800)];
    assert_eq!(effective_remaining_seconds(&upgrade, &boosts, t(1_800)), 0.0);
}

#[test]
fn test_remaining_never_negative() {
    let upgrade = hour_upgrade();
    let boosts = vec![home_category_boost(0, 3_600, 50.0)];
    let remaining = effective_remaining_seconds(&upgrade, &boosts, t(1_200));
    assert_eq!(remaining, 0.0);
}

#[test]
fn test_blanket_boosts_do_not_stack() {
    let upgrade = hour_upgrade();
    let single = vec![blanket(600, 1_200)];
    let doubled = vec![blanket(600, 1_200), blanket(600, 1_200)];
    let overlapping = vec![blanket(600, 1_200), blanket(900, 1_500)];

    let one = effective_remaining_seconds(&upgrade, &single, t(1_800));
    assert_eq!(one, 1_800.0 - 600.0);
    assert_eq!(effective_remaining_seconds(&upgrade, &doubled, t(1_800)), one);
    // Union [600, 1500] at +1
    assert_eq!(
        effective_remaining_seconds(&upgrade, &overlapping, t(1_800)),
        1_800.0 - 900.0
    );
}

#[test]
fn test_additive_boosts_stack() {
    let upgrade = hour_upgrade();
    let boosts = vec![
        home_category_boost(0, 600, 1.0),
        home_category_boost(0, 600, 1.0),
    ];
    // 600s at +2 = 1200s extra work
    let remaining = effective_remaining_seconds(&upgrade, &boosts, t(1_000));
    assert_eq!(remaining, 2_600.0 - 1_200.0);
}

#[test]
fn test_blanket_and_additive_combine() {
    let upgrade = hour_upgrade();
    let boosts = vec![
        blanket(0, 300),
        blanket(0, 300),
        home_category_boost(0, 300, 2.0),
    ];
    // 300s at +1 (one blanket) +2 (additive) = 900s extra
    let remaining = effective_remaining_seconds(&upgrade, &boosts, t(600));
    assert_eq!(remaining, 3_000.0 - 900.0);
}

#[test]
fn test_targeted_boost_for_other_upgrade_is_ignored() {
    let upgrade = hour_upgrade();
    let boosts = vec![
        ActiveBoost::new(BoostKind::BuilderApprentice, t(0), t(3_600))
            .with_level(5)
            .targeting(Uuid::new_v4()),
    ];
    assert_eq!(effective_remaining_seconds(&upgrade, &boosts, t(900)), 2_700.0);
    assert_eq!(effective_completion_date(&upgrade, &boosts, t(900)), t(3_600));
}

#[test]
fn test_targeted_boost_for_this_upgrade_applies() {
    let upgrade = hour_upgrade();
    let boosts = vec![
        ActiveBoost::new(BoostKind::BuilderApprentice, t(0), t(600))
            .with_level(2)
            .targeting(upgrade.id),
    ];
    // 600s at +2 = 1200s extra work
    assert_eq!(effective_remaining_seconds(&upgrade, &boosts, t(900)), 2_700.0 - 1_200.0);
}

#[test]
fn test_boost_in_other_category_is_ignored() {
    let upgrade = hour_upgrade();
    let boosts = vec![ActiveBoost::new(BoostKind::ResearchPotion, t(0), t(3_600))];
    assert_eq!(effective_remaining_seconds(&upgrade, &boosts, t(900)), 2_700.0);
}

#[test]
fn test_boost_clamped_to_upgrade_start_and_reference() {
    let upgrade = Upgrade::new(5, "Cannon", 3, UpgradeCategory::HomeVillage, t(1_000), t(11_000));
    // Boost runs before the upgrade began and beyond the reference instant
    let boosts = vec![home_category_boost(0, 20_000, 1.0)];
    // Only [1000, 4000] counts: 3000s extra
    let remaining = effective_remaining_seconds(&upgrade, &boosts, t(4_000));
    assert_eq!(remaining, 7_000.0 - 3_000.0);
}

#[test]
fn test_boost_outside_elapsed_window_contributes_nothing() {
    let upgrade = hour_upgrade();
    let boosts = vec![home_category_boost(2_000, 2_500, 4.0)];
    assert_eq!(effective_remaining_seconds(&upgrade, &boosts, t(1_000)), 2_600.0);
}

#[test]
fn test_reference_before_start_ignores_boosts() {
    let upgrade = Upgrade::new(5, "Cannon", 3, UpgradeCategory::HomeVillage, t(1_000), t(4_600));
    let boosts = vec![home_category_boost(0, 4_600, 3.0)];
    assert_eq!(effective_remaining_seconds(&upgrade, &boosts, t(500)), 4_100.0);
    assert_eq!(effective_remaining_seconds(&upgrade, &boosts, t(1_000)), 3_600.0);
}

#[test]
fn test_staggered_boosts_integrate_per_segment() {
    let upgrade = Upgrade::new(9, "Town Hall", 16, UpgradeCategory::HomeVillage, t(0), t(36_000));
    let boosts = vec![
        home_category_boost(0, 1_000, 1.0),
        home_category_boost(500, 1_500, 2.0),
        blanket(800, 2_000),
    ];
    // [0,500): +1          -> 500
    // [500,800): +1 +2     -> 900
    // [800,1000): +1 +2 +1 -> 800
    // [1000,1500): +2 +1   -> 1500
    // [1500,2000): +1      -> 500
    let remaining = effective_remaining_seconds(&upgrade, &boosts, t(3_000));
    assert_eq!(remaining, 33_000.0 - 4_200.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Completion projection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_projection_short_circuits_inside_boost() {
    let upgrade = Upgrade::new(2, "Gold Storage", 10, UpgradeCategory::HomeVillage, t(-100), t(100));
    let boosts = vec![home_category_boost(0, 86_400, 1.0)];
    assert_eq!(effective_completion_date(&upgrade, &boosts, t(0)), t(50));
}

#[test]
fn test_projection_continues_unboosted_after_boosts_expire() {
    let upgrade = hour_upgrade();
    let boosts = vec![ActiveBoost::new(BoostKind::BuilderPotion, t(0), t(300))];
    // 300s at 10x burns 3000s; 600s of work remains at normal rate
    assert_eq!(effective_completion_date(&upgrade, &boosts, t(0)), t(900));
}

#[test]
fn test_projection_waits_for_future_boost() {
    let upgrade = hour_upgrade();
    let boosts = vec![home_category_boost(1_800, 86_400, 1.0)];
    // 1800s unboosted, then 1800s of work at 2x = 900s
    assert_eq!(effective_completion_date(&upgrade, &boosts, t(0)), t(2_700));
}

#[test]
fn test_projection_ignores_expired_boosts() {
    let upgrade = hour_upgrade();
    let boosts = vec![home_category_boost(0, 600, 3.0)];
    assert_eq!(effective_completion_date(&upgrade, &boosts, t(1_200)), t(3_600));
}

#[test]
fn test_projection_of_finished_upgrade_is_nominal_end() {
    let upgrade = hour_upgrade();
    let boosts = vec![blanket(0, 86_400)];
    assert_eq!(effective_completion_date(&upgrade, &boosts, t(4_000)), t(3_600));
}

#[test]
fn test_projection_blanket_non_stacking() {
    let upgrade = hour_upgrade();
    let boosts = vec![blanket(0, 86_400), blanket(0, 86_400)];
    // Two blankets still mean 2x, not 3x
    assert_eq!(effective_completion_date(&upgrade, &boosts, t(0)), t(1_800));
}

#[test]
fn test_projection_fractional_seconds_round_to_millis() {
    let upgrade = Upgrade::new(3, "Elixir Pump", 7, UpgradeCategory::HomeVillage, t(0), t(100));
    let boosts = vec![home_category_boost(0, 86_400, 2.0)];
    let expected = t(0) + Duration::milliseconds(33_333);
    assert_eq!(effective_completion_date(&upgrade, &boosts, t(0)), expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Progress
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_progress_is_zero_at_start_without_boosts() {
    let upgrade = hour_upgrade();
    assert_eq!(boosted_progress_fraction(&upgrade, &[], 0.0, t(0)), 0.0);
    assert_eq!(boosted_progress_fraction(&upgrade, &[], 20.0, t(0)), 0.0);
}

#[test]
fn test_progress_is_one_when_boosted_complete() {
    let upgrade = hour_upgrade();
    let boosts = vec![blanket(0, 1_800)];
    assert_eq!(boosted_progress_fraction(&upgrade, &boosts, 0.0, t(1_800)), 1.0);
}

#[test]
fn test_progress_midway() {
    let upgrade = hour_upgrade();
    assert_eq!(boosted_progress_fraction(&upgrade, &[], 0.0, t(900)), 0.25);
}

#[test]
fn test_gold_pass_scales_denominator_only() {
    let upgrade = hour_upgrade();
    // Total 3600 * 0.8 = 2880, remaining 1800 -> elapsed 1080
    let progress = boosted_progress_fraction(&upgrade, &[], 20.0, t(1_800));
    assert!((progress - 1_080.0 / 2_880.0).abs() < 1e-9);
}

#[test]
fn test_full_gold_pass_does_not_divide_by_zero() {
    let upgrade = hour_upgrade();
    let progress = boosted_progress_fraction(&upgrade, &[], 100.0, t(1_800));
    assert!(progress.is_finite());
    assert_eq!(progress, 0.0);
    assert_eq!(boosted_progress_fraction(&upgrade, &[], 100.0, t(3_600)), 1.0);
}

#[test]
fn test_progress_stays_in_bounds() {
    let upgrade = hour_upgrade();
    let boosts = vec![blanket(0, 3_600), home_category_boost(100, 200, 40.0)];
    for pct in [-50.0, 0.0, 15.0, 100.0, 250.0] {
        for offset in [-3_600, 0, 10, 150, 1_800, 3_600, 9_000] {
            let progress = boosted_progress_fraction(&upgrade, &boosts, pct, t(offset));
            assert!((0.0..=1.0).contains(&progress), "pct={pct} offset={offset}");
        }
    }
}

#[test]
fn test_zero_length_upgrade_floors_total() {
    let upgrade = Upgrade::new(4, "Wall", 2, UpgradeCategory::HomeVillage, t(0), t(0));
    assert_eq!(boosted_progress_fraction(&upgrade, &[], 0.0, t(0)), 1.0);
}
