use serde::{Deserialize, Deserializer, Serialize};

/// Which upgrade queue an in-progress upgrade occupies.
///
/// Boosts select the upgrades they accelerate by category, and the widget
/// and notification views group by it. Unrecognized names in stored data
/// read back as [`UpgradeCategory::HomeVillage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeCategory {
    /// Home village buildings, traps and heroes (worked by builders)
    #[default]
    HomeVillage,
    /// Troops and spells researched in the laboratory
    Laboratory,
    /// Pets in the pet house
    PetHouse,
    /// Builder base buildings, traps and heroes
    BuilderBase,
    /// Builder base troops researched in the star laboratory
    StarLab,
}

impl<'de> Deserialize<'de> for UpgradeCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

impl UpgradeCategory {
    pub const ALL: [UpgradeCategory; 5] = [
        Self::HomeVillage,
        Self::Laboratory,
        Self::PetHouse,
        Self::BuilderBase,
        Self::StarLab,
    ];

    /// Parse a stored name, accepting the older camelCase names
    pub fn from_name(name: &str) -> Self {
        match name {
            "laboratory" | "lab" => Self::Laboratory,
            "pet_house" | "pets" => Self::PetHouse,
            "builder_base" | "builderBase" => Self::BuilderBase,
            "star_lab" | "starLab" => Self::StarLab,
            _ => Self::HomeVillage,
        }
    }

    /// Whether a builder works this queue (shown in the builders widget)
    pub fn is_builder_work(&self) -> bool {
        matches!(self, Self::HomeVillage | Self::BuilderBase)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::HomeVillage => "Builders",
            Self::Laboratory => "Laboratory",
            Self::PetHouse => "Pet House",
            Self::BuilderBase => "Builder Base",
            Self::StarLab => "Star Laboratory",
        }
    }

    /// Grouping key for notifications of this category
    pub fn thread_id(&self) -> &'static str {
        match self {
            Self::HomeVillage => "builder_village",
            Self::Laboratory => "laboratory",
            Self::PetHouse => "pet_house",
            Self::BuilderBase => "builder_base",
            Self::StarLab => "star_laboratory",
        }
    }
}
