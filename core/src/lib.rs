pub mod api;
pub mod boost;
pub mod catalog;
pub mod config;
pub mod import;
pub mod notify;
pub mod profile;
pub mod storage;
pub mod time;
pub mod upgrade;

// Re-exports for convenience
pub use boost::{
    ActiveBoost, BoostKind, Stacking, boosted_progress_fraction, effective_completion_date,
    effective_remaining_seconds,
};
pub use catalog::UpgradeCatalog;
pub use config::AppConfig;
pub use profile::{PlayerAccount, ProfileStore};
pub use storage::{AppState, StateFile};
pub use upgrade::{TimerContext, Upgrade, UpgradeTimer};
