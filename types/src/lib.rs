//! Shared types for ClashDash
//!
//! Plain serde value types used by both the core engine and the front ends,
//! plus the display formatting helpers every timer view goes through.

pub mod formatting;

mod category;
mod settings;

pub use category::UpgradeCategory;
pub use settings::{AppearancePreference, GOLD_PASS_STEPS, NotificationSettings};
