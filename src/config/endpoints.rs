//! Well-known device authorization endpoints.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Device authorization and token endpoint pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub device_authorization_url: String,
    pub token_url: String,
}

/// Providers with a built-in endpoint preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Provider {
    Google,
    #[strum(serialize = "github")]
    #[serde(rename = "github")]
    GitHub,
}

impl Provider {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Self::Google => Endpoint {
                device_authorization_url: "https://oauth2.googleapis.com/device/code".to_string(),
                token_url: "https://oauth2.googleapis.com/token".to_string(),
            },
            Self::GitHub => Endpoint {
                device_authorization_url: "https://github.com/login/device/code".to_string(),
                token_url: "https://github.com/login/oauth/access_token".to_string(),
            },
        }
    }
}
