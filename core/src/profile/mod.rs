//! Multiple tracked accounts
//!
//! Each [`PlayerAccount`] owns its upgrades, boosts, helper levels and
//! notification settings. [`ProfileStore`] keeps them ordered and tracks
//! which one is selected; every per-account operation acts on the selection.

mod account;
mod store;

pub use account::{DEFAULT_BUILDER_COUNT, PlayerAccount};
pub use store::{NewProfile, ProfileStore};
