//! Player profile refresh from the public game API
//!
//! The client is async (reqwest) and stateless. Cooldown bookkeeping lives in
//! [`RefreshGate`], and writing a response back onto a profile is
//! [`crate::profile::ProfileStore::store_api_profile`].

mod client;
mod gate;
mod player;

use thiserror::Error;

use clashdash_types::formatting::format_cooldown;

pub use client::{ApiClient, DEFAULT_BASE_URL, FetchedProfile};
pub use gate::{REFRESH_COOLDOWN_SECS, RefreshGate};
pub use player::{BadgeUrls, Clan, LeveledEntry, PlayerProfile};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no API key configured")]
    MissingKey,
    #[error("invalid player tag: {0:?}")]
    InvalidTag(String),
    #[error("request failed")]
    Http(#[from] reqwest::Error),
    #[error("API returned status {status}")]
    Status { status: u16, body: String },
    #[error("failed to decode player profile")]
    Decode(#[from] serde_json::Error),
    #[error("please wait {} to refresh again", format_cooldown(*.0))]
    CoolingDown(f64),
}
