use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Token;
use crate::error::TokenError;

/// Interval RFC 8628 §3.2 prescribes when the server sends none.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Device authorization response (RFC 8628 §3.2).
///
/// # Example
/// ```
/// use oauth_device_flow::auth::DeviceAuthorization;
///
/// let authorization = DeviceAuthorization {
///     device_code: "GmRhmhcxhwAzkoEqiMEg_DnyEysNkuNhszIySk9eS".to_string(),
///     user_code: "WDJB-MJHT".to_string(),
///     verification_uri: "https://example.com/device".to_string(),
///     verification_uri_complete: None,
///     expires_in: 1800,
///     interval: 5,
/// };
/// assert_eq!(
///     authorization.prompt(),
///     "Visit https://example.com/device and enter the code: WDJB-MJHT"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    #[serde(alias = "verification_url")]
    pub verification_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_uri_complete: Option<String>,
    /// Lifetime of the device code in seconds; `0` means the server gave none.
    #[serde(default)]
    pub expires_in: u64,
    /// Minimum seconds between token requests.
    #[serde(default)]
    pub interval: u64,
}

impl DeviceAuthorization {
    /// URL to show the user, preferring the one with the code embedded.
    pub fn verification_url(&self) -> &str {
        self.verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri)
    }

    /// Ready-to-display instructions for the user.
    pub fn prompt(&self) -> String {
        match &self.verification_uri_complete {
            Some(complete) => format!(
                "Visit {complete} and confirm the code: {}",
                self.user_code
            ),
            None => format!(
                "Visit {} and enter the code: {}",
                self.verification_uri, self.user_code
            ),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Client-side lifetime of the device code, `None` when unbounded.
    pub fn expires_in(&self) -> Option<Duration> {
        (self.expires_in > 0).then(|| Duration::from_secs(self.expires_in))
    }

    pub(crate) fn normalized(mut self) -> Self {
        if self.interval == 0 {
            self.interval = DEFAULT_INTERVAL_SECS;
        }
        self
    }
}

/// Outcome of a single token request during a device-code flow.
#[derive(Debug, Clone)]
pub enum DeviceCodePoll {
    /// The user has not finished yet.
    Pending,
    /// Polling too fast; `server_interval` is the interval the server asked for, if any.
    SlowDown { server_interval: Option<u64> },
    Authorized { token: Token },
    AccessDenied(TokenError),
    Expired(TokenError),
}
