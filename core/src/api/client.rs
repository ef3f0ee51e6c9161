use std::time::Duration;

use super::{ApiError, PlayerProfile};
use crate::import::normalize_tag;

pub const DEFAULT_BASE_URL: &str = "https://cocproxy.royaleapi.dev";
const USER_AGENT: &str = concat!("clashdash/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A decoded profile together with the body it came from
#[derive(Debug, Clone)]
pub struct FetchedProfile {
    pub tag: String,
    pub profile: PlayerProfile,
    pub raw_json: String,
}

/// Thin client over the player endpoint
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, ApiError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ApiError::MissingKey)?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// `<base>/v1/players/%23<TAG>`
    pub fn player_url(&self, tag: &str) -> Result<String, ApiError> {
        let tag = valid_tag(tag)?;
        Ok(format!("{}/v1/players/%23{}", self.base_url, tag))
    }

    pub async fn fetch_player(&self, tag: &str) -> Result<FetchedProfile, ApiError> {
        let tag = valid_tag(tag)?;
        let url = self.player_url(&tag)?;
        tracing::debug!(%tag, "Fetching player profile");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%tag, status = status.as_u16(), "Player fetch rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let profile: PlayerProfile = serde_json::from_str(&body)?;
        tracing::info!(%tag, name = %profile.name, "Fetched player profile");
        Ok(FetchedProfile {
            tag,
            profile,
            raw_json: body,
        })
    }
}

/// Normalized tag, rejecting empty or non-alphanumeric input
fn valid_tag(raw: &str) -> Result<String, ApiError> {
    let tag = normalize_tag(raw);
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::InvalidTag(raw.to_string()));
    }
    Ok(tag)
}
