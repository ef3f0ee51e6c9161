use chrono::{DateTime, Duration, Utc};

use super::ApiError;
use crate::time::seconds_between;

/// Minimum spacing between two fetches of the same profile
pub const REFRESH_COOLDOWN_SECS: i64 = 180;

/// Rate limit on profile refreshes, keyed on the last fetch time
#[derive(Debug, Clone, Copy)]
pub struct RefreshGate {
    cooldown: Duration,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new(Duration::seconds(REFRESH_COOLDOWN_SECS))
    }
}

impl RefreshGate {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Seconds left before another fetch is allowed, `None` when clear
    pub fn remaining(&self, last_fetch: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<f64> {
        let last_fetch = last_fetch?;
        let ready_at = last_fetch + self.cooldown;
        (now < ready_at).then(|| seconds_between(now, ready_at))
    }

    pub fn check(&self, last_fetch: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<(), ApiError> {
        match self.remaining(last_fetch, now) {
            Some(secs) => Err(ApiError::CoolingDown(secs)),
            None => Ok(()),
        }
    }
}
