//! RFC 6749 §5.2 error responses.

use std::fmt;

use strum::{AsRefStr, Display, EnumString};

/// Registered OAuth error codes the device flow cares about.
///
/// Servers may send codes outside this list; those stay available verbatim
/// through `error_code` and parse to `None` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    UnauthorizedClient,
    UnsupportedGrantType,
    InvalidScope,
    AuthorizationPending,
    SlowDown,
    AccessDenied,
    ExpiredToken,
}

macro_rules! oauth_error {
    ($(#[$meta:meta])* $name:ident, $endpoint:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub status_code: u16,
            pub error_code: String,
            pub error_description: Option<String>,
            pub error_uri: Option<String>,
            pub body: Option<String>,
        }

        impl $name {
            pub fn new(status_code: u16, error_code: impl Into<String>) -> Self {
                Self {
                    status_code,
                    error_code: error_code.into(),
                    error_description: None,
                    error_uri: None,
                    body: None,
                }
            }

            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.error_description = Some(description.into());
                self
            }

            pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
                self.error_uri = Some(uri.into());
                self
            }

            pub fn with_body(mut self, body: impl Into<String>) -> Self {
                self.body = Some(body.into());
                self
            }

            /// The registered code, if `error_code` is one.
            pub fn code(&self) -> Option<ErrorCode> {
                self.error_code.parse().ok()
            }

            pub fn is(&self, code: ErrorCode) -> bool {
                self.error_code == code.as_ref()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{} endpoint returned `{}` (status {})",
                    $endpoint, self.error_code, self.status_code
                )
            }
        }

        impl std::error::Error for $name {}
    };
}

oauth_error!(
    /// Error answered by the device authorization endpoint.
    AuthorizationError,
    "device authorization"
);

oauth_error!(
    /// Error answered by the token endpoint.
    ///
    /// `authorization_pending` and `slow_down` arrive as this type from a
    /// single token request; only the poller treats them as pacing signals.
    TokenError,
    "token"
);
