//! Boost-aware upgrade timers
//!
//! This module provides:
//! - **Kinds**: which upgrades a boost accelerates and whether it stacks
//! - **Active boosts**: time-bounded speed bonuses applied to a profile
//! - **Calculations**: remaining time, projected completion and progress
//!
//! # Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Upgrade (nominal, unboosted schedule)            │
//! │        "Archer Tower 12, started 09:00, ends tomorrow 09:00"     │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!              ActiveBoost windows (rate bonuses over time)
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   piecewise-constant rate: 1 + Σ bonus of boosts live per segment │
//! │   backward integral -> remaining  │  forward integral -> finish  │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!              Dashboard rows, widgets, notification triggers
//! ```
//!
//! Boosts are rate bonuses on elapsed time, not duration reducers: a boost
//! with bonus `+1.0` makes one second of wall-clock time count as two
//! seconds of upgrade work. Blanket boosts (clock tower, potions) never
//! stack with each other within a segment; everything else is additive.

mod active;
mod calc;
mod kind;
mod timeline;

#[cfg(test)]
mod calc_tests;

pub use active::ActiveBoost;
pub use calc::{boosted_progress_fraction, effective_completion_date, effective_remaining_seconds};
pub use kind::{BoostKind, Stacking};
