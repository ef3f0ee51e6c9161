//! In-progress upgrades and the timer views built over them
//!
//! [`Upgrade`] carries the nominal schedule exactly as imported. Every
//! surface that shows a countdown (dashboard rows, builder widget,
//! notification triggers) goes through [`TimerContext`] so boosts and the
//! gold pass are applied the same way everywhere.

mod model;
mod timer;

pub use model::Upgrade;
pub use timer::{BuilderSlot, MAX_BUILDER_SLOTS, TimerContext, UpgradeTimer, builder_slots};
