use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DEFAULT_BUILDER_COUNT, PlayerAccount};
use crate::api::FetchedProfile;
use crate::boost::ActiveBoost;
use crate::import::{ImportResult, normalize_tag};

/// Optional settings for a newly added profile
#[derive(Debug, Clone, Copy)]
pub struct NewProfile {
    pub builder_count: u32,
    pub builder_apprentice_level: u8,
    pub lab_assistant_level: u8,
    pub alchemist_level: u8,
    pub gold_pass_boost: u8,
}

impl Default for NewProfile {
    fn default() -> Self {
        Self {
            builder_count: DEFAULT_BUILDER_COUNT,
            builder_apprentice_level: 0,
            lab_assistant_level: 0,
            alchemist_level: 0,
            gold_pass_boost: 0,
        }
    }
}

/// Ordered profiles plus the selected one.
///
/// Never empty: deleting the last profile leaves a fresh fallback in its
/// place, and the selection always names a stored profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles: Vec<PlayerAccount>,
    selected: Uuid,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    pub fn new() -> Self {
        let fallback = PlayerAccount::default();
        Self {
            selected: fallback.id,
            profiles: vec![fallback],
        }
    }

    /// Rebuild from persisted parts, repairing an empty list or a dangling
    /// selection
    pub fn from_parts(profiles: Vec<PlayerAccount>, selected: Option<Uuid>) -> Self {
        if profiles.is_empty() {
            return Self::new();
        }
        let selected = selected
            .filter(|id| profiles.iter().any(|p| p.id == *id))
            .unwrap_or(profiles[0].id);
        Self { profiles, selected }
    }

    pub fn profiles(&self) -> &[PlayerAccount] {
        &self.profiles
    }

    pub fn selected_id(&self) -> Uuid {
        self.selected
    }

    pub fn get(&self, id: Uuid) -> Option<&PlayerAccount> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut PlayerAccount> {
        self.profiles.iter_mut().find(|p| p.id == id)
    }

    pub fn current(&self) -> &PlayerAccount {
        let index = self.selected_index();
        &self.profiles[index]
    }

    pub fn current_mut(&mut self) -> &mut PlayerAccount {
        let index = self.selected_index();
        &mut self.profiles[index]
    }

    fn selected_index(&self) -> usize {
        self.profiles
            .iter()
            .position(|p| p.id == self.selected)
            .unwrap_or(0)
    }

    /// Select a stored profile; unknown ids are ignored
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = id;
        true
    }

    /// Add and select a profile for `tag`.
    ///
    /// A tag that normalizes to nothing adds nothing and returns the current
    /// profile's id.
    pub fn add_profile(&mut self, tag: &str, options: NewProfile) -> Uuid {
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return self.selected;
        }
        let profile = PlayerAccount {
            display_name: self.default_profile_name(),
            tag,
            builder_count: options.builder_count,
            builder_apprentice_level: options.builder_apprentice_level,
            lab_assistant_level: options.lab_assistant_level,
            alchemist_level: options.alchemist_level,
            gold_pass_boost: options.gold_pass_boost.min(100),
            ..PlayerAccount::default()
        };
        let id = profile.id;
        tracing::info!(%id, tag = %profile.tag, "Added profile");
        self.profiles.push(profile);
        self.selected = id;
        id
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        let Some(index) = self.profiles.iter().position(|p| p.id == id) else {
            return false;
        };
        self.profiles.remove(index);
        tracing::info!(%id, "Deleted profile");

        if self.profiles.is_empty() {
            *self = Self::new();
        } else if self.selected == id {
            self.selected = self.profiles[0].id;
        }
        true
    }

    /// Rename and retag. An empty name falls back to the tag, then to a
    /// default `Profile N` name.
    pub fn update(&mut self, id: Uuid, display_name: &str, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        let name = display_name.trim();
        let name = if !name.is_empty() {
            name.to_string()
        } else if !tag.is_empty() {
            tag.clone()
        } else {
            self.default_profile_name()
        };

        let Some(profile) = self.get_mut(id) else {
            return false;
        };
        profile.display_name = name;
        profile.tag = tag;
        true
    }

    pub fn display_name(&self, id: Uuid) -> Option<&str> {
        self.get(id).map(PlayerAccount::visible_name)
    }

    /// First `Profile N` not already taken
    pub fn default_profile_name(&self) -> String {
        (1..)
            .map(|n| format!("Profile {n}"))
            .find(|name| !self.profiles.iter().any(|p| &p.display_name == name))
            .unwrap_or_else(|| "Profile".to_string())
    }

    /// Replace the current profile's upgrades with an import.
    ///
    /// Targeted boosts whose upgrade disappeared are dropped, since imported
    /// upgrades get fresh identities.
    pub fn apply_import(&mut self, import: ImportResult) {
        let profile = self.current_mut();
        profile.raw_json = import.raw_json;
        profile.last_import_date = Some(import.imported_at);
        profile.active_upgrades = import.upgrades;

        let inferred = u32::try_from(import.inferred_builder_count).unwrap_or(u32::MAX);
        if inferred > profile.builder_count {
            profile.builder_count = inferred;
        }
        if let Some(tag) = import.tag {
            if profile.display_name.trim().is_empty() {
                profile.display_name = tag.clone();
            }
            profile.tag = tag;
        }

        let upgrades = &profile.active_upgrades;
        let before = profile.active_boosts.len();
        profile
            .active_boosts
            .retain(|boost| boost.target.is_none_or(|id| upgrades.iter().any(|u| u.id == id)));
        let orphaned = before - profile.active_boosts.len();
        if orphaned > 0 {
            tracing::debug!(orphaned, "Dropped boosts targeting replaced upgrades");
        }
    }

    /// Drop finished upgrades from the current profile, returning how many
    pub fn prune_completed(&mut self, reference: DateTime<Utc>) -> usize {
        let profile = self.current_mut();
        let before = profile.active_upgrades.len();
        profile.active_upgrades.retain(|u| u.end_time > reference);
        before - profile.active_upgrades.len()
    }

    /// Forget the current profile's imported data, keeping its identity
    pub fn clear_data(&mut self) {
        let profile = self.current_mut();
        profile.active_upgrades.clear();
        profile.active_boosts.clear();
        profile.raw_json.clear();
        profile.last_import_date = None;
    }

    /// Back to a single fresh profile
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn add_boost(&mut self, boost: ActiveBoost) {
        self.current_mut().active_boosts.push(boost);
    }

    pub fn clear_boosts(&mut self) {
        self.current_mut().active_boosts.clear();
    }

    /// Drop boosts that ended at or before `now`, returning how many
    pub fn prune_expired_boosts(&mut self, now: DateTime<Utc>) -> usize {
        let profile = self.current_mut();
        let before = profile.active_boosts.len();
        profile.active_boosts.retain(|b| !b.is_expired(now));
        before - profile.active_boosts.len()
    }

    /// Store the gold pass percentage, clamped to `0..=100`
    pub fn set_gold_pass(&mut self, percent: i64) {
        self.current_mut().gold_pass_boost = percent.clamp(0, 100) as u8;
    }

    /// Write a fetched API profile onto profile `id`
    pub fn store_api_profile(&mut self, id: Uuid, fetched: FetchedProfile, now: DateTime<Utc>) -> bool {
        let Some(profile) = self.get_mut(id) else {
            return false;
        };
        profile.tag = fetched.tag;
        let name = profile.display_name.trim();
        if name.is_empty() || name == profile.tag {
            profile.display_name = fetched.profile.name.clone();
        }
        profile.cached_profile = Some(fetched.profile);
        profile.api_profile_json = fetched.raw_json;
        profile.last_api_fetch_date = Some(now);
        true
    }

    pub fn into_parts(self) -> (Vec<PlayerAccount>, Uuid) {
        (self.profiles, self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlayerProfile;
    use crate::boost::BoostKind;
    use crate::upgrade::Upgrade;
    use chrono::TimeZone;
    use clashdash_types::UpgradeCategory;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn import_of(upgrades: Vec<Upgrade>, tag: Option<&str>, builders: usize) -> ImportResult {
        ImportResult {
            tag: tag.map(str::to_string),
            upgrades,
            inferred_builder_count: builders,
            raw_json: "{\"timestamp\":0}".to_string(),
            imported_at: t(0),
        }
    }

    #[test]
    fn test_new_store_has_one_selected_profile() {
        let store = ProfileStore::new();
        assert_eq!(store.profiles().len(), 1);
        assert_eq!(store.current().id, store.selected_id());
    }

    #[test]
    fn test_add_profile_selects_and_names() {
        let mut store = ProfileStore::new();
        let id = store.add_profile(" #abc ", NewProfile::default());
        assert_eq!(store.selected_id(), id);
        assert_eq!(store.current().tag, "ABC");
        assert_eq!(store.current().display_name, "Profile 1");

        let second = store.add_profile("def", NewProfile::default());
        assert_eq!(store.get(second).unwrap().display_name, "Profile 2");
    }

    #[test]
    fn test_add_profile_rejects_empty_tag() {
        let mut store = ProfileStore::new();
        let before = store.selected_id();
        assert_eq!(store.add_profile(" # ", NewProfile::default()), before);
        assert_eq!(store.profiles().len(), 1);
    }

    #[test]
    fn test_delete_reselects_and_refills() {
        let mut store = ProfileStore::new();
        let first = store.selected_id();
        let second = store.add_profile("ABC", NewProfile::default());

        assert!(store.delete(second));
        assert_eq!(store.selected_id(), first);

        assert!(store.delete(first));
        assert_eq!(store.profiles().len(), 1);
        assert_ne!(store.selected_id(), first);
        assert!(!store.delete(Uuid::new_v4()));
    }

    #[test]
    fn test_update_name_fallbacks() {
        let mut store = ProfileStore::new();
        let id = store.selected_id();

        store.update(id, "  Main  ", "#xyz");
        assert_eq!(store.current().display_name, "Main");
        assert_eq!(store.current().tag, "XYZ");

        store.update(id, "", "#xyz");
        assert_eq!(store.current().display_name, "XYZ");

        store.update(id, "", "");
        assert_eq!(store.current().display_name, "Profile 1");
    }

    #[test]
    fn test_from_parts_repairs_selection() {
        let profiles = vec![PlayerAccount::default(), PlayerAccount::default()];
        let first = profiles[0].id;
        let store = ProfileStore::from_parts(profiles, Some(Uuid::new_v4()));
        assert_eq!(store.selected_id(), first);

        let store = ProfileStore::from_parts(Vec::new(), None);
        assert_eq!(store.profiles().len(), 1);
    }

    #[test]
    fn test_apply_import_updates_current_profile() {
        let mut store = ProfileStore::new();
        store.current_mut().display_name.clear();
        let upgrades = vec![Upgrade::new(1, "Cannon", 2, UpgradeCategory::HomeVillage, t(0), t(60))];
        store.apply_import(import_of(upgrades, Some("P2YL9Q"), 7));

        let current = store.current();
        assert_eq!(current.active_upgrades.len(), 1);
        assert_eq!(current.builder_count, 7);
        assert_eq!(current.tag, "P2YL9Q");
        assert_eq!(current.display_name, "P2YL9Q");
        assert_eq!(current.last_import_date, Some(t(0)));
    }

    #[test]
    fn test_apply_import_never_lowers_builders() {
        let mut store = ProfileStore::new();
        store.apply_import(import_of(Vec::new(), None, 2));
        assert_eq!(store.current().builder_count, DEFAULT_BUILDER_COUNT);
    }

    #[test]
    fn test_apply_import_drops_orphaned_targets() {
        let mut store = ProfileStore::new();
        store.add_boost(ActiveBoost::new(BoostKind::BuilderApprentice, t(0), t(60)).targeting(Uuid::new_v4()));
        store.add_boost(ActiveBoost::new(BoostKind::BuilderPotion, t(0), t(60)));
        store.apply_import(import_of(Vec::new(), None, 0));
        assert_eq!(store.current().active_boosts.len(), 1);
    }

    #[test]
    fn test_prune_completed_and_expired() {
        let mut store = ProfileStore::new();
        store.current_mut().active_upgrades = vec![
            Upgrade::new(1, "Done", 2, UpgradeCategory::HomeVillage, t(0), t(60)),
            Upgrade::new(2, "Running", 2, UpgradeCategory::HomeVillage, t(0), t(600)),
        ];
        store.add_boost(ActiveBoost::new(BoostKind::BuilderPotion, t(0), t(60)));
        store.add_boost(ActiveBoost::new(BoostKind::ClockTower, t(0), t(600)));

        assert_eq!(store.prune_completed(t(60)), 1);
        assert_eq!(store.prune_expired_boosts(t(60)), 1);
        assert_eq!(store.current().active_upgrades[0].name, "Running");
        assert_eq!(store.current().active_boosts[0].kind, BoostKind::ClockTower);
    }

    #[test]
    fn test_clear_data_keeps_identity() {
        let mut store = ProfileStore::new();
        let id = store.selected_id();
        store.apply_import(import_of(Vec::new(), Some("ABC"), 0));
        store.clear_data();
        assert_eq!(store.current().id, id);
        assert!(store.current().raw_json.is_empty());
        assert!(store.current().last_import_date.is_none());
        assert_eq!(store.current().tag, "ABC");
    }

    #[test]
    fn test_gold_pass_is_clamped() {
        let mut store = ProfileStore::new();
        store.set_gold_pass(250);
        assert_eq!(store.current().gold_pass_boost, 100);
        store.set_gold_pass(-5);
        assert_eq!(store.current().gold_pass_boost, 0);
        store.set_gold_pass(15);
        assert_eq!(store.current().gold_pass_percent(), 15.0);
    }

    #[test]
    fn test_store_api_profile_renames_tag_named_profile() {
        let mut store = ProfileStore::new();
        let id = store.selected_id();
        store.update(id, "", "P2YL9Q");
        let fetched = FetchedProfile {
            tag: "P2YL9Q".to_string(),
            profile: PlayerProfile {
                tag: "#P2YL9Q".to_string(),
                name: "Chief".to_string(),
                town_hall_level: 12,
                exp_level: 100,
                trophies: 3000,
                best_trophies: 3100,
                clan: None,
                heroes: None,
                troops: None,
                spells: None,
            },
            raw_json: "{}".to_string(),
        };
        assert!(store.store_api_profile(id, fetched.clone(), t(5)));
        assert_eq!(store.current().display_name, "Chief");
        assert_eq!(store.current().last_api_fetch_date, Some(t(5)));

        store.update(id, "Main", "P2YL9Q");
        store.store_api_profile(id, fetched, t(10));
        assert_eq!(store.current().display_name, "Main");
    }
}
