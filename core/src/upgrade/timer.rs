use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use clashdash_types::UpgradeCategory;
use clashdash_types::formatting::{format_progress, format_time_remaining};

use super::Upgrade;
use crate::boost::{
    ActiveBoost, boosted_progress_fraction, effective_completion_date, effective_remaining_seconds,
};

/// The builders widget never shows more than this many slots
pub const MAX_BUILDER_SLOTS: usize = 6;

/// Boost state and clock shared by every timer computed in one pass
#[derive(Debug, Clone, Copy)]
pub struct TimerContext<'a> {
    pub boosts: &'a [ActiveBoost],
    pub gold_pass_percent: f64,
    pub reference: DateTime<Utc>,
}

impl<'a> TimerContext<'a> {
    pub fn new(boosts: &'a [ActiveBoost], gold_pass_percent: f64, reference: DateTime<Utc>) -> Self {
        Self {
            boosts,
            gold_pass_percent,
            reference,
        }
    }

    /// Unboosted view at `reference`
    pub fn unboosted(reference: DateTime<Utc>) -> Self {
        Self::new(&[], 0.0, reference)
    }

    pub fn timer(&self, upgrade: &Upgrade) -> UpgradeTimer {
        let remaining_seconds = effective_remaining_seconds(upgrade, self.boosts, self.reference);
        UpgradeTimer {
            id: upgrade.id,
            name: upgrade.name.clone(),
            target_level: upgrade.target_level,
            category: upgrade.category,
            remaining_seconds,
            completes_at: effective_completion_date(upgrade, self.boosts, self.reference),
            progress: boosted_progress_fraction(
                upgrade,
                self.boosts,
                self.gold_pass_percent,
                self.reference,
            ),
        }
    }

    /// Timers for every upgrade, soonest projected completion first
    pub fn timers<'u>(&self, upgrades: impl IntoIterator<Item = &'u Upgrade>) -> Vec<UpgradeTimer> {
        let mut timers: Vec<UpgradeTimer> = upgrades.into_iter().map(|u| self.timer(u)).collect();
        timers.sort_by_key(|timer| timer.completes_at);
        timers
    }
}

/// Boost-aware snapshot of one upgrade
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeTimer {
    pub id: Uuid,
    pub name: String,
    pub target_level: u32,
    pub category: UpgradeCategory,
    /// Boosted real seconds still needed
    pub remaining_seconds: f64,
    /// Projected completion including scheduled boosts
    pub completes_at: DateTime<Utc>,
    /// Progress in `[0, 1]`
    pub progress: f64,
}

impl UpgradeTimer {
    pub fn is_complete(&self) -> bool {
        self.remaining_seconds <= 0.0
    }

    pub fn remaining_label(&self) -> String {
        format_time_remaining(self.remaining_seconds)
    }

    pub fn progress_label(&self) -> String {
        format_progress(self.progress)
    }
}

/// One cell of the builders widget
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderSlot {
    Busy(UpgradeTimer),
    /// Free builder, numbered from 1
    Idle(usize),
}

impl BuilderSlot {
    pub fn title(&self) -> String {
        match self {
            Self::Busy(timer) => timer.name.clone(),
            Self::Idle(number) => format!("Builder {number}"),
        }
    }

    pub fn subtitle(&self) -> String {
        match self {
            Self::Busy(timer) => timer.remaining_label(),
            Self::Idle(_) => "Available".to_string(),
        }
    }
}

/// Builder-worked upgrades padded with idle builders, capped at
/// [`MAX_BUILDER_SLOTS`].
pub fn builder_slots(upgrades: &[Upgrade], builder_count: usize, ctx: &TimerContext) -> Vec<BuilderSlot> {
    let busy = ctx.timers(
        upgrades
            .iter()
            .filter(|u| u.category.is_builder_work() && !u.is_complete(ctx.reference)),
    );
    let slot_count = builder_count.max(busy.len()).min(MAX_BUILDER_SLOTS);

    let mut slots: Vec<BuilderSlot> = busy
        .into_iter()
        .take(slot_count)
        .map(BuilderSlot::Busy)
        .collect();
    while slots.len() < slot_count {
        slots.push(BuilderSlot::Idle(slots.len() + 1));
    }
    slots
}
