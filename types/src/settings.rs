use serde::{Deserialize, Serialize};

use crate::UpgradeCategory;

/// Per-profile notification preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub notifications_enabled: bool,
    pub builder_notifications: bool,
    pub lab_notifications: bool,
    pub pet_notifications: bool,
    pub builder_base_notifications: bool,
    /// Fire this many minutes before the projected completion
    pub pre_notify_minutes: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: false,
            builder_notifications: true,
            lab_notifications: true,
            pet_notifications: true,
            builder_base_notifications: true,
            pre_notify_minutes: 0,
        }
    }
}

impl NotificationSettings {
    /// Whether completions in `category` should be announced
    pub fn allows(&self, category: UpgradeCategory) -> bool {
        match category {
            UpgradeCategory::HomeVillage => self.builder_notifications,
            UpgradeCategory::Laboratory => self.lab_notifications,
            UpgradeCategory::PetHouse => self.pet_notifications,
            UpgradeCategory::BuilderBase | UpgradeCategory::StarLab => {
                self.builder_base_notifications
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearancePreference {
    #[default]
    Device,
    Light,
    Dark,
}

/// Gold pass boost percentages offered in the season pass
pub const GOLD_PASS_STEPS: [u8; 4] = [0, 10, 15, 20];
