use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clashdash_types::{AppearancePreference, NotificationSettings};

use crate::profile::{PlayerAccount, ProfileStore};
use crate::upgrade::Upgrade;

pub const STATE_VERSION: u32 = 1;

/// Everything persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub version: u32,
    pub profiles: Vec<PlayerAccount>,
    #[serde(rename = "selectedProfileID", default)]
    pub selected_profile_id: Option<Uuid>,
    #[serde(default)]
    pub appearance_preference: AppearancePreference,
    /// Global settings from before they moved onto profiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<NotificationSettings>,
}

impl AppState {
    pub fn from_store(store: &ProfileStore, appearance_preference: AppearancePreference) -> Self {
        Self {
            version: STATE_VERSION,
            profiles: store.profiles().to_vec(),
            selected_profile_id: Some(store.selected_id()),
            appearance_preference,
            notification_settings: None,
        }
    }

    pub fn into_store(self) -> ProfileStore {
        ProfileStore::from_parts(self.profiles, self.selected_profile_id)
    }

    /// Move global notification settings onto profiles that never changed
    /// their own
    pub(super) fn migrate_notification_settings(&mut self) {
        let Some(global) = self.notification_settings.take() else {
            return;
        };
        let defaults = NotificationSettings::default();
        for profile in &mut self.profiles {
            if profile.notification_settings == defaults {
                profile.notification_settings = global.clone();
            }
        }
        tracing::info!("Migrated global notification settings onto profiles");
    }
}

/// Single-profile snapshot written by early versions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LegacyAppState {
    #[allow(dead_code)]
    pub widget_text: String,
    pub player_tag: String,
    #[serde(rename = "rawJSON")]
    pub raw_json: String,
    pub last_import_date: Option<DateTime<Utc>>,
    pub active_upgrades: Option<Vec<Upgrade>>,
}

impl From<LegacyAppState> for AppState {
    fn from(legacy: LegacyAppState) -> Self {
        let display_name = if legacy.player_tag.is_empty() {
            "Profile 1".to_string()
        } else {
            legacy.player_tag.clone()
        };
        let profile = PlayerAccount {
            display_name,
            tag: legacy.player_tag,
            raw_json: legacy.raw_json,
            last_import_date: legacy.last_import_date,
            active_upgrades: legacy.active_upgrades.unwrap_or_default(),
            ..PlayerAccount::default()
        };
        Self {
            version: STATE_VERSION,
            selected_profile_id: Some(profile.id),
            profiles: vec![profile],
            appearance_preference: AppearancePreference::Device,
            notification_settings: Some(NotificationSettings::default()),
        }
    }
}
