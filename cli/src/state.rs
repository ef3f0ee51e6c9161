use chrono::{DateTime, Utc};

use clashdash_core::upgrade::{TimerContext, UpgradeTimer};
use clashdash_core::{AppConfig, AppState, ProfileStore, StateFile, UpgradeCatalog};
use clashdash_types::AppearancePreference;

/// Everything a command needs, shared across the prompt loop
pub struct CliState {
    pub config: AppConfig,
    pub catalog: UpgradeCatalog,
    pub store: ProfileStore,
    pub appearance: AppearancePreference,
    pub state_file: StateFile,
}

impl CliState {
    pub fn with_config(config: AppConfig) -> Self {
        let state_file = config.state_file();
        let catalog = config.load_catalog();
        let (store, appearance) = match state_file.load() {
            Some(state) => {
                let appearance = state.appearance_preference;
                (state.into_store(), appearance)
            }
            None => (ProfileStore::new(), AppearancePreference::default()),
        };
        Self {
            config,
            catalog,
            store,
            appearance,
            state_file,
        }
    }

    pub fn persist(&self) -> Result<(), String> {
        let snapshot = AppState::from_store(&self.store, self.appearance);
        self.state_file.save(&snapshot).map_err(|e| {
            tracing::error!(error = %e, "Failed to save app state");
            format!("Failed to save: {e}")
        })
    }

    /// Current profile's timers, soonest completion first
    pub fn timers(&self, now: DateTime<Utc>) -> Vec<UpgradeTimer> {
        let profile = self.store.current();
        let ctx = TimerContext::new(
            &profile.active_boosts,
            profile.gold_pass_percent(),
            now,
        );
        ctx.timers(&profile.active_upgrades)
    }
}
