use chrono::Duration;
use serde::{Deserialize, Serialize};

use clashdash_types::UpgradeCategory;

/// How concurrent boosts of a kind combine within one time segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
    /// Only one blanket boost counts per segment, whichever comes first
    Blanket,
    /// Bonuses add up with every other boost
    Additive,
}

/// Source of a speed boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoostKind {
    /// Builder base clock tower: everything on the builder base runs 10x
    ClockTower,
    /// Builder potion: home village builders run 10x
    BuilderPotion,
    /// Research potion: laboratory runs 24x
    ResearchPotion,
    /// Pet potion: pet house runs 24x
    PetPotion,
    /// Builder's apprentice assigned to one upgrade, `+level` per second
    BuilderApprentice,
    /// Lab assistant assigned to one research, `+level` per second
    LabAssistant,
    /// Generic additive multiplier over one category
    CategoryWide { category: UpgradeCategory },
}

impl BoostKind {
    pub fn stacking(&self) -> Stacking {
        match self {
            Self::ClockTower | Self::BuilderPotion | Self::ResearchPotion | Self::PetPotion => {
                Stacking::Blanket
            }
            Self::BuilderApprentice | Self::LabAssistant | Self::CategoryWide { .. } => {
                Stacking::Additive
            }
        }
    }

    /// Targeted kinds only ever apply to the single upgrade they name
    pub fn is_targeted(&self) -> bool {
        matches!(self, Self::BuilderApprentice | Self::LabAssistant)
    }

    /// Leveled helpers scale their bonus with level
    pub fn is_leveled(&self) -> bool {
        self.is_targeted()
    }

    pub fn affects(&self, category: UpgradeCategory) -> bool {
        match self {
            Self::ClockTower => matches!(
                category,
                UpgradeCategory::BuilderBase | UpgradeCategory::StarLab
            ),
            Self::BuilderPotion | Self::BuilderApprentice => {
                category == UpgradeCategory::HomeVillage
            }
            Self::ResearchPotion | Self::LabAssistant => category == UpgradeCategory::Laboratory,
            Self::PetPotion => category == UpgradeCategory::PetHouse,
            Self::CategoryWide { category: target } => *target == category,
        }
    }

    /// Extra seconds of work per wall-clock second while active
    pub fn default_bonus(&self, level: Option<u8>) -> f64 {
        match self {
            Self::ClockTower | Self::BuilderPotion => 9.0,
            Self::ResearchPotion | Self::PetPotion => 23.0,
            Self::BuilderApprentice | Self::LabAssistant => f64::from(level.unwrap_or(1).max(1)),
            Self::CategoryWide { .. } => 1.0,
        }
    }

    /// How long one activation lasts in game
    pub fn default_duration(&self) -> Duration {
        match self {
            Self::ClockTower => Duration::minutes(30),
            _ => Duration::hours(1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ClockTower => "Clock Tower",
            Self::BuilderPotion => "Builder Potion",
            Self::ResearchPotion => "Research Potion",
            Self::PetPotion => "Pet Potion",
            Self::BuilderApprentice => "Builder's Apprentice",
            Self::LabAssistant => "Lab Assistant",
            Self::CategoryWide { .. } => "Category Boost",
        }
    }
}
