//! Client configuration (layered: code > config file > env).

pub mod endpoints;

pub use endpoints::{Endpoint, Provider};

use std::path::Path;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{DeviceFlowError, Result};

/// OAuth client registration and endpoints for one device flow.
///
/// # Example
/// ```
/// use oauth_device_flow::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .client_id("my-client")
///     .device_authorization_url("https://auth.example.com/device")
///     .token_url("https://auth.example.com/token")
///     .scopes(vec!["openid".to_string()])
///     .build();
/// assert_eq!(config.scope_param().as_deref(), Some("openid"));
/// ```
#[derive(Clone, Builder, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[builder(into)]
    pub client_id: String,
    #[builder(into)]
    #[serde(default)]
    pub client_secret: Option<String>,
    #[builder(into)]
    pub device_authorization_url: String,
    #[builder(into)]
    pub token_url: String,
    #[builder(default)]
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| ".."))
            .field("device_authorization_url", &self.device_authorization_url)
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl ClientConfig {
    /// Config for a provider preset.
    pub fn for_provider(provider: Provider, client_id: impl Into<String>) -> Self {
        let endpoint = provider.endpoint();
        Self {
            client_id: client_id.into(),
            client_secret: None,
            device_authorization_url: endpoint.device_authorization_url,
            token_url: endpoint.token_url,
            scopes: Vec::new(),
        }
    }

    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Load from environment variables (`OAUTH_CLIENT_ID`, `OAUTH_TOKEN_URL`, etc.).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// Explicit endpoint variables win over an `OAUTH_PROVIDER` preset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let preset = match get("OAUTH_PROVIDER") {
            Some(name) => Some(name.parse::<Provider>().map_err(|_| {
                DeviceFlowError::Configuration(format!("Unknown OAUTH_PROVIDER: {name}"))
            })?),
            None => None,
        }
        .map(Provider::endpoint);

        let client_id = get("OAUTH_CLIENT_ID").ok_or_else(|| {
            DeviceFlowError::Configuration("OAUTH_CLIENT_ID not set".to_string())
        })?;
        let device_authorization_url = get("OAUTH_DEVICE_AUTHORIZATION_URL")
            .or_else(|| preset.as_ref().map(|e| e.device_authorization_url.clone()))
            .ok_or_else(|| {
                DeviceFlowError::Configuration(
                    "OAUTH_DEVICE_AUTHORIZATION_URL not set".to_string(),
                )
            })?;
        let token_url = get("OAUTH_TOKEN_URL")
            .or_else(|| preset.as_ref().map(|e| e.token_url.clone()))
            .ok_or_else(|| DeviceFlowError::Configuration("OAUTH_TOKEN_URL not set".to_string()))?;

        let config = Self {
            client_id,
            client_secret: get("OAUTH_CLIENT_SECRET"),
            device_authorization_url,
            token_url,
            scopes: get("OAUTH_SCOPES")
                .map(|raw| split_scopes(&raw))
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DeviceFlowError::Configuration(format!(
                "Failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Reject configs that cannot produce a valid request.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(DeviceFlowError::Configuration(
                "client_id must not be empty".to_string(),
            ));
        }
        check_url("device_authorization_url", &self.device_authorization_url)?;
        check_url("token_url", &self.token_url)
    }

    /// Client secret to send, treating an empty value as absent.
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
    }

    /// Space-delimited `scope` parameter (RFC 6749 §3.3), if any scopes are set.
    pub fn scope_param(&self) -> Option<String> {
        if self.scopes.is_empty() {
            None
        } else {
            Some(self.scopes.join(" "))
        }
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| DeviceFlowError::Configuration(format!("{field} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DeviceFlowError::Configuration(format!(
            "{field} must use http or https, got {other}"
        ))),
    }
}

pub(crate) fn split_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|scope| !scope.is_empty())
        .map(str::to_string)
        .collect()
}
