use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clashdash_types::NotificationSettings;

use crate::api::PlayerProfile;
use crate::boost::ActiveBoost;
use crate::upgrade::Upgrade;

pub const DEFAULT_BUILDER_COUNT: u32 = 5;

/// One tracked game account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerAccount {
    pub id: Uuid,
    pub display_name: String,
    /// Normalized tag without `#`
    pub tag: String,
    /// Last imported export, verbatim
    #[serde(rename = "rawJSON")]
    pub raw_json: String,
    pub last_import_date: Option<DateTime<Utc>>,
    pub active_upgrades: Vec<Upgrade>,
    pub active_boosts: Vec<ActiveBoost>,
    pub notification_settings: NotificationSettings,
    pub builder_count: u32,
    pub builder_apprentice_level: u8,
    pub lab_assistant_level: u8,
    pub alchemist_level: u8,
    /// Gold pass build/research time reduction, percent
    pub gold_pass_boost: u8,
    pub cached_profile: Option<PlayerProfile>,
    #[serde(rename = "apiProfileJSON")]
    pub api_profile_json: String,
    #[serde(rename = "lastAPIFetchDate")]
    pub last_api_fetch_date: Option<DateTime<Utc>>,
}

impl Default for PlayerAccount {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: "New Profile".to_string(),
            tag: String::new(),
            raw_json: String::new(),
            last_import_date: None,
            active_upgrades: Vec::new(),
            active_boosts: Vec::new(),
            notification_settings: NotificationSettings::default(),
            builder_count: DEFAULT_BUILDER_COUNT,
            builder_apprentice_level: 0,
            lab_assistant_level: 0,
            alchemist_level: 0,
            gold_pass_boost: 0,
            cached_profile: None,
            api_profile_json: String::new(),
            last_api_fetch_date: None,
        }
    }
}

impl PlayerAccount {
    /// Name shown in pickers: display name, else tag, else `Profile`
    pub fn visible_name(&self) -> &str {
        if !self.display_name.is_empty() {
            &self.display_name
        } else if !self.tag.is_empty() {
            &self.tag
        } else {
            "Profile"
        }
    }

    /// Widget header: display name, else `#TAG`, else the app name
    pub fn widget_title(&self) -> String {
        if !self.display_name.is_empty() {
            self.display_name.clone()
        } else if !self.tag.is_empty() {
            format!("#{}", self.tag)
        } else {
            "ClashDash".to_string()
        }
    }

    pub fn upgrade(&self, id: Uuid) -> Option<&Upgrade> {
        self.active_upgrades.iter().find(|u| u.id == id)
    }

    pub fn gold_pass_percent(&self) -> f64 {
        f64::from(self.gold_pass_boost)
    }
}
