use serde::Deserialize;

use clashdash_types::UpgradeCategory;

/// Account export blob copied out of the game
#[derive(Debug, Clone, Deserialize)]
pub struct GameExport {
    pub tag: Option<String>,
    /// Export time, seconds since the epoch
    pub timestamp: i64,
    pub buildings: Option<Vec<ExportItem>>,
    pub buildings2: Option<Vec<ExportItem>>,
    pub traps: Option<Vec<ExportItem>>,
    pub traps2: Option<Vec<ExportItem>>,
    pub heroes: Option<Vec<ExportItem>>,
    pub heroes2: Option<Vec<ExportItem>>,
    pub pets: Option<Vec<ExportItem>>,
    pub units: Option<Vec<ExportItem>>,
    pub units2: Option<Vec<ExportItem>>,
    pub spells: Option<Vec<ExportItem>>,
}

/// One building, trap, hero, pet, unit or spell entry
#[derive(Debug, Clone, Deserialize)]
pub struct ExportItem {
    /// Game data id
    pub data: i64,
    /// Current level
    pub lvl: u32,
    /// Seconds left on a running upgrade; absent when idle
    pub timer: Option<i64>,
    pub cnt: Option<u32>,
}

impl ExportItem {
    /// Remaining seconds when this item is mid-upgrade
    pub fn upgrade_timer(&self) -> Option<i64> {
        self.timer.filter(|&secs| secs > 0)
    }
}

/// An export list together with where its upgrades belong
pub(super) struct ExportSection<'a> {
    pub items: &'a [ExportItem],
    pub category: UpgradeCategory,
    /// Placeholder name prefix when the catalog has no name
    pub fallback_prefix: &'static str,
}

impl GameExport {
    pub(super) fn sections(&self) -> Vec<ExportSection<'_>> {
        use UpgradeCategory::*;

        let lists: [(&Option<Vec<ExportItem>>, UpgradeCategory, &'static str); 10] = [
            (&self.buildings, HomeVillage, "Building"),
            (&self.buildings2, BuilderBase, "Builder Base Building"),
            (&self.traps, HomeVillage, "Trap"),
            (&self.traps2, BuilderBase, "Builder Base Trap"),
            (&self.heroes, HomeVillage, "Hero"),
            (&self.heroes2, BuilderBase, "Builder Base Hero"),
            (&self.pets, PetHouse, "Pet"),
            (&self.units, Laboratory, "Unit"),
            (&self.units2, Laboratory, "Secondary Unit"),
            (&self.spells, Laboratory, "Spell"),
        ];

        lists
            .into_iter()
            .filter_map(|(list, category, fallback_prefix)| {
                list.as_deref().map(|items| ExportSection {
                    items,
                    category,
                    fallback_prefix,
                })
            })
            .collect()
    }
}
