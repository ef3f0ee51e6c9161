use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BoostKind;
use crate::upgrade::Upgrade;

/// A speed boost live over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBoost {
    pub kind: BoostKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Upgrade a targeted helper is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Uuid>,
    /// Helper level, scales the bonus of leveled kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Explicit bonus overriding the kind default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<f64>,
}

impl ActiveBoost {
    /// Create a boost, swapping a reversed interval so `start <= end`
    pub fn new(kind: BoostKind, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            kind,
            start,
            end,
            target: None,
            level: None,
            bonus: None,
        }
    }

    /// Create a boost lasting the kind's in-game duration from `start`
    pub fn starting_at(kind: BoostKind, start: DateTime<Utc>) -> Self {
        Self::new(kind, start, start + kind.default_duration())
    }

    /// `None` when `start + duration` leaves the representable range
    pub fn for_duration(kind: BoostKind, start: DateTime<Utc>, duration: Duration) -> Option<Self> {
        start
            .checked_add_signed(duration)
            .map(|end| Self::new(kind, start, end))
    }

    pub fn targeting(mut self, upgrade_id: Uuid) -> Self {
        self.target = Some(upgrade_id);
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_bonus(mut self, bonus: f64) -> Self {
        self.bonus = Some(bonus);
        self
    }

    /// Extra seconds of work contributed per wall-clock second
    pub fn speed_bonus(&self) -> f64 {
        self.bonus
            .unwrap_or_else(|| self.kind.default_bonus(self.level))
            .max(0.0)
    }

    /// Category match, plus identity match for targeted kinds
    pub fn applies_to(&self, upgrade: &Upgrade) -> bool {
        if !self.kind.affects(upgrade.category) {
            return false;
        }
        if self.kind.is_targeted() {
            return self.target == Some(upgrade.id);
        }
        true
    }

    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clashdash_types::UpgradeCategory;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn lab_upgrade() -> Upgrade {
        Upgrade::new(1, "Wizard", 9, UpgradeCategory::Laboratory, t(0), t(3_600))
    }

    #[test]
    fn test_reversed_interval_is_normalized() {
        let boost = ActiveBoost::new(BoostKind::ResearchPotion, t(100), t(10));
        assert_eq!(boost.start, t(10));
        assert_eq!(boost.end, t(100));
    }

    #[test]
    fn test_targeted_requires_matching_identity() {
        let upgrade = lab_upgrade();
        let untargeted = ActiveBoost::starting_at(BoostKind::LabAssistant, t(0));
        assert!(!untargeted.applies_to(&upgrade));

        let targeted = untargeted.clone().targeting(upgrade.id);
        assert!(targeted.applies_to(&upgrade));

        let elsewhere = untargeted.targeting(Uuid::new_v4());
        assert!(!elsewhere.applies_to(&upgrade));
    }

    #[test]
    fn test_category_mismatch_never_applies() {
        let upgrade = lab_upgrade();
        let potion = ActiveBoost::starting_at(BoostKind::BuilderPotion, t(0));
        assert!(!potion.applies_to(&upgrade));
    }

    #[test]
    fn test_bonus_override_and_level() {
        let boost = ActiveBoost::starting_at(BoostKind::BuilderApprentice, t(0)).with_level(6);
        assert_eq!(boost.speed_bonus(), 6.0);
        assert_eq!(boost.with_bonus(2.5).speed_bonus(), 2.5);
    }

    #[test]
    fn test_for_duration_out_of_range() {
        let kind = BoostKind::BuilderPotion;
        let boost = ActiveBoost::for_duration(kind, t(0), Duration::minutes(90)).unwrap();
        assert_eq!(boost.end, t(5_400));
        assert!(ActiveBoost::for_duration(kind, t(0), Duration::MAX).is_none());
    }

    #[test]
    fn test_active_window_is_half_open() {
        let boost = ActiveBoost::new(BoostKind::PetPotion, t(0), t(60));
        assert!(boost.is_active_at(t(0)));
        assert!(boost.is_active_at(t(59)));
        assert!(!boost.is_active_at(t(60)));
        assert!(boost.is_expired(t(60)));
    }
}
