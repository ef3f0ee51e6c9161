use serde::{Deserialize, Serialize};

/// Public player profile as returned by `/v1/players/{tag}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub tag: String,
    pub name: String,
    pub town_hall_level: u32,
    pub exp_level: u32,
    pub trophies: u32,
    pub best_trophies: u32,
    pub clan: Option<Clan>,
    pub heroes: Option<Vec<LeveledEntry>>,
    pub troops: Option<Vec<LeveledEntry>>,
    pub spells: Option<Vec<LeveledEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clan {
    pub tag: String,
    pub name: String,
    pub clan_level: u32,
    pub badge_urls: BadgeUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeUrls {
    pub small: String,
    pub medium: String,
    pub large: String,
}

/// Hero, troop or spell with its level progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeveledEntry {
    pub name: String,
    pub level: u32,
    pub max_level: u32,
    /// `home` or `builderBase`
    pub village: String,
}

impl LeveledEntry {
    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }
}

impl PlayerProfile {
    /// Home village heroes not yet at their max level
    pub fn unfinished_heroes(&self) -> impl Iterator<Item = &LeveledEntry> {
        self.heroes
            .iter()
            .flatten()
            .filter(|hero| hero.village == "home" && !hero.is_maxed())
    }
}
