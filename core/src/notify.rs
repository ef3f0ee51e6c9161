//! Completion notification planning
//!
//! Produces the set of local notifications that should be pending for a
//! profile and the minimal change against what is pending now. Delivery is
//! the platform's job; identifiers carry a fixed prefix so only requests
//! created here are ever removed.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use clashdash_types::NotificationSettings;

use crate::boost::{ActiveBoost, effective_completion_date, effective_remaining_seconds};
use crate::upgrade::Upgrade;

pub const IDENTIFIER_PREFIX: &str = "com.clashdash.upgrade.";

/// One local notification to schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub identifier: String,
    pub upgrade_id: Uuid,
    pub title: String,
    pub body: String,
    pub thread_id: &'static str,
    pub fire_at: DateTime<Utc>,
}

/// What to remove from and add to the pending set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationDiff {
    pub remove: Vec<String>,
    pub add: Vec<NotificationRequest>,
}

impl NotificationDiff {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

pub fn identifier_for(upgrade_id: Uuid) -> String {
    format!("{IDENTIFIER_PREFIX}{upgrade_id}")
}

/// Requests that should be pending at `reference`.
///
/// Empty when notifications are disabled. Fire dates follow the boosted
/// completion projection, moved earlier by the pre-notify lead but never
/// sooner than one second after `reference`.
pub fn plan(
    upgrades: &[Upgrade],
    boosts: &[ActiveBoost],
    settings: &NotificationSettings,
    reference: DateTime<Utc>,
) -> Vec<NotificationRequest> {
    if !settings.notifications_enabled {
        return Vec::new();
    }

    let lead = Duration::minutes(i64::from(settings.pre_notify_minutes));
    let earliest = reference + Duration::seconds(1);

    upgrades
        .iter()
        .filter(|u| settings.allows(u.category))
        .filter(|u| effective_remaining_seconds(u, boosts, reference) > 0.0)
        .map(|upgrade| {
            let completes_at = effective_completion_date(upgrade, boosts, reference);
            NotificationRequest {
                identifier: identifier_for(upgrade.id),
                upgrade_id: upgrade.id,
                title: "Upgrade Complete".to_string(),
                body: format!(
                    "{} finished upgrading to level {}.",
                    upgrade.name, upgrade.target_level
                ),
                thread_id: upgrade.category.thread_id(),
                fire_at: (completes_at - lead).max(earliest),
            }
        })
        .collect()
}

/// Reconcile pending identifiers with the desired requests.
///
/// Identifiers outside [`IDENTIFIER_PREFIX`] are left alone. Desired requests
/// already pending are not re-added.
pub fn diff<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    desired: Vec<NotificationRequest>,
) -> NotificationDiff {
    let managed: HashSet<&str> = existing
        .into_iter()
        .filter(|id| id.starts_with(IDENTIFIER_PREFIX))
        .collect();
    let wanted: HashSet<&str> = desired.iter().map(|r| r.identifier.as_str()).collect();

    let mut remove: Vec<String> = managed
        .iter()
        .filter(|id| !wanted.contains(*id))
        .map(|id| id.to_string())
        .collect();
    remove.sort();

    let add = desired
        .into_iter()
        .filter(|r| !managed.contains(r.identifier.as_str()))
        .collect();

    NotificationDiff { remove, add }
}
