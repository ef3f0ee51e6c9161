use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clashdash_types::UpgradeCategory;
use clashdash_types::formatting::format_time_remaining;

use crate::time::seconds_between;

/// An in-progress upgrade on its nominal, unboosted schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredUpgrade")]
pub struct Upgrade {
    pub id: Uuid,
    /// Game data id of the building/unit being upgraded
    pub data_id: i64,
    pub name: String,
    pub target_level: u32,
    pub category: UpgradeCategory,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Nominal total duration in seconds
    pub total_duration: f64,
}

impl Upgrade {
    /// Create an upgrade spanning `[start, end]` with a fresh identity.
    /// A reversed interval collapses to a zero-length upgrade ending at `end`.
    pub fn new(
        data_id: i64,
        name: impl Into<String>,
        target_level: u32,
        category: UpgradeCategory,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let start_time = start_time.min(end_time);
        Self {
            id: Uuid::new_v4(),
            data_id,
            name: name.into(),
            target_level,
            category,
            start_time,
            end_time,
            total_duration: seconds_between(start_time, end_time),
        }
    }

    /// Unboosted seconds left at `now`, never negative
    pub fn raw_remaining(&self, now: DateTime<Utc>) -> f64 {
        seconds_between(now, self.end_time).max(0.0)
    }

    pub fn is_complete(&self, now: DateTime<Utc>) -> bool {
        self.end_time <= now
    }

    /// Unboosted remaining time label (`Complete`, `2d 3h`, `4h 5m`, `6m`)
    pub fn time_remaining_label(&self, now: DateTime<Utc>) -> String {
        format_time_remaining(self.raw_remaining(now))
    }
}

/// On-disk shape; older snapshots only carried the end time and a category
/// that may be missing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUpgrade {
    id: Uuid,
    #[serde(default)]
    data_id: i64,
    name: String,
    target_level: u32,
    #[serde(default)]
    category: UpgradeCategory,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
    end_time: DateTime<Utc>,
    #[serde(default)]
    total_duration: Option<f64>,
}

impl From<StoredUpgrade> for Upgrade {
    fn from(stored: StoredUpgrade) -> Self {
        let start_time = stored
            .start_time
            .unwrap_or(stored.end_time)
            .min(stored.end_time);
        let total_duration = stored
            .total_duration
            .unwrap_or_else(|| seconds_between(start_time, stored.end_time))
            .max(0.0);
        Self {
            id: stored.id,
            data_id: stored.data_id,
            name: stored.name,
            target_level: stored.target_level,
            category: stored.category,
            start_time,
            end_time: stored.end_time,
            total_duration,
        }
    }
}
