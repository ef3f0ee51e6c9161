//! Remaining time, completion projection and progress under boosts.
//!
//! All three functions are pure: they read an upgrade snapshot and a boost
//! list and never fail. Degenerate inputs clamp to the unboosted baseline.

use chrono::{DateTime, Utc};

use super::ActiveBoost;
use super::timeline::{boundaries, combined_bonus, relevant_boosts};
use crate::time::{offset_by_seconds, seconds_between};
use crate::upgrade::Upgrade;

/// Real time still needed at `reference`, crediting boosted work already done.
///
/// Boost time after `reference` is not credited here; see
/// [`effective_completion_date`] for the forward projection.
pub fn effective_remaining_seconds(
    upgrade: &Upgrade,
    boosts: &[ActiveBoost],
    reference: DateTime<Utc>,
) -> f64 {
    let raw_remaining = seconds_between(reference, upgrade.end_time).max(0.0);
    if reference <= upgrade.start_time {
        return raw_remaining;
    }

    let start = upgrade.start_time;
    // Each relevant boost clamped to [start, reference], empty windows dropped
    let windows: Vec<(&ActiveBoost, DateTime<Utc>, DateTime<Utc>)> =
        relevant_boosts(upgrade, boosts)
            .filter_map(|boost| {
                let from = boost.start.max(start);
                let to = boost.end.min(reference);
                (from < to).then_some((boost, from, to))
            })
            .collect();
    if windows.is_empty() {
        return raw_remaining;
    }

    let mut instants = Vec::with_capacity(windows.len() * 2 + 2);
    instants.push(start);
    instants.push(reference);
    for (_, from, to) in &windows {
        instants.push(*from);
        instants.push(*to);
    }
    let instants = boundaries(instants);

    let mut extra_elapsed = 0.0;
    for pair in instants.windows(2) {
        let (seg_start, seg_end) = (pair[0], pair[1]);
        if seg_end <= seg_start {
            continue;
        }
        let bonus = combined_bonus(
            windows
                .iter()
                .filter(|(_, from, to)| *from <= seg_start && seg_start < *to)
                .map(|(boost, _, _)| *boost),
        );
        extra_elapsed += seconds_between(seg_start, seg_end) * bonus;
    }

    (raw_remaining - extra_elapsed).max(0.0)
}

/// Wall-clock instant the remaining nominal work runs out, given current and
/// scheduled boosts.
pub fn effective_completion_date(
    upgrade: &Upgrade,
    boosts: &[ActiveBoost],
    reference: DateTime<Utc>,
) -> DateTime<Utc> {
    let mut remaining_work = seconds_between(reference, upgrade.end_time).max(0.0);
    if remaining_work <= 0.0 {
        return upgrade.end_time;
    }

    let relevant: Vec<&ActiveBoost> = relevant_boosts(upgrade, boosts).collect();
    if relevant.is_empty() {
        return upgrade.end_time;
    }

    let mut upcoming: Vec<&ActiveBoost> = relevant
        .into_iter()
        .filter(|boost| boost.end > reference)
        .collect();
    upcoming.sort_by_key(|boost| boost.end);

    let mut instants = Vec::with_capacity(upcoming.len() * 2 + 1);
    instants.push(reference);
    for boost in &upcoming {
        if boost.start > reference {
            instants.push(boost.start);
        }
        instants.push(boost.end);
    }
    let instants = boundaries(instants);

    for pair in instants.windows(2) {
        let (seg_start, seg_end) = (pair[0], pair[1]);
        let rate = 1.0
            + combined_bonus(
                upcoming
                    .iter()
                    .copied()
                    .filter(|boost| boost.is_active_at(seg_start)),
            );
        let work_done = seconds_between(seg_start, seg_end) * rate;
        if work_done >= remaining_work {
            return offset_by_seconds(seg_start, remaining_work / rate);
        }
        remaining_work -= work_done;
    }

    // Boosts ran out first: finish at the normal rate
    let last = instants.last().copied().unwrap_or(reference);
    offset_by_seconds(last, remaining_work)
}

/// Progress in `[0, 1]` for progress bars.
///
/// The gold pass percentage shortens the nominal total used as the
/// denominator only; the boosted remaining time comes from
/// [`effective_remaining_seconds`] unchanged.
pub fn boosted_progress_fraction(
    upgrade: &Upgrade,
    boosts: &[ActiveBoost],
    gold_pass_percent: f64,
    reference: DateTime<Utc>,
) -> f64 {
    let gold_pass_factor = 1.0 - gold_pass_percent.clamp(0.0, 100.0) / 100.0;
    let effective_total = (upgrade.total_duration * gold_pass_factor).max(1.0);
    let boosted_remaining = effective_remaining_seconds(upgrade, boosts, reference);
    let elapsed = (effective_total - boosted_remaining).max(0.0);
    (elapsed / effective_total).clamp(0.0, 1.0)
}
