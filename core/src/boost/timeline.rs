//! Segment helpers shared by the backward and forward integrals.

use chrono::{DateTime, Utc};

use super::{ActiveBoost, Stacking};
use crate::upgrade::Upgrade;

/// Boosts whose category and target select this upgrade
pub(super) fn relevant_boosts<'a>(
    upgrade: &'a Upgrade,
    boosts: &'a [ActiveBoost],
) -> impl Iterator<Item = &'a ActiveBoost> + 'a {
    boosts.iter().filter(move |boost| boost.applies_to(upgrade))
}

/// Sum the bonuses of boosts live in one segment.
///
/// Only the first blanket boost in iteration order counts; additive boosts
/// all contribute.
pub(super) fn combined_bonus<'a>(active: impl IntoIterator<Item = &'a ActiveBoost>) -> f64 {
    let mut bonus = 0.0;
    let mut blanket_counted = false;
    for boost in active {
        if boost.kind.stacking() == Stacking::Blanket {
            if blanket_counted {
                continue;
            }
            blanket_counted = true;
        }
        bonus += boost.speed_bonus();
    }
    bonus
}

/// Sort and dedup transition instants into segment boundaries
pub(super) fn boundaries(mut instants: Vec<DateTime<Utc>>) -> Vec<DateTime<Utc>> {
    instants.sort();
    instants.dedup();
    instants
}
