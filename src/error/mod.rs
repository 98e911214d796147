//! Error types for the device authorization flow.

pub mod oauth;

pub use oauth::{AuthorizationError, ErrorCode, TokenError};

use thiserror::Error;

/// Why a flow ended in the expired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryReason {
    /// The client-side deadline derived from `expires_in` passed.
    Deadline,
    /// The token endpoint answered `expired_token`.
    Server(TokenError),
}

/// Broad error category for routing caller logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Protocol,
    Authorization,
    Denied,
    Expired,
    Cancelled,
}

/// Primary error type for all device flow operations.
#[derive(Error, Debug)]
pub enum DeviceFlowError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Access denied by the user ({0})")]
    AccessDenied(TokenError),

    #[error("Device code expired before authorization completed")]
    Expired { reason: ExpiryReason },

    #[error("Device flow cancelled")]
    Cancelled,
}

impl DeviceFlowError {
    pub fn transport(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(error.into())
    }

    /// The OAuth `error` member behind this failure, if any.
    pub fn oauth_error_code(&self) -> Option<&str> {
        match self {
            Self::Authorization(err) => Some(&err.error_code),
            Self::Token(err) | Self::AccessDenied(err) => Some(&err.error_code),
            Self::Expired {
                reason: ExpiryReason::Server(err),
            } => Some(&err.error_code),
            _ => None,
        }
    }

    /// HTTP status of the OAuth error response, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authorization(err) => Some(err.status_code),
            Self::Token(err) | Self::AccessDenied(err) => Some(err.status_code),
            Self::Expired {
                reason: ExpiryReason::Server(err),
            } => Some(err.status_code),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Transport(_) => ErrorCategory::Network,
            Self::Parse(_) => ErrorCategory::Protocol,
            Self::Authorization(_) | Self::Token(_) => ErrorCategory::Authorization,
            Self::AccessDenied(_) => ErrorCategory::Denied,
            Self::Expired { .. } => ErrorCategory::Expired,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }
}

impl From<reqwest::Error> for DeviceFlowError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(Box::new(error))
    }
}

impl From<serde_json::Error> for DeviceFlowError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

impl From<toml::de::Error> for DeviceFlowError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DeviceFlowError>;
