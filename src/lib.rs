//! OAuth 2.0 Device Authorization Grant (RFC 8628) client.
//!
//! Requests a device and user code, hands them to a presenter, then polls the
//! token endpoint at the pace the server dictates until the user approves,
//! denies, the code expires, or the caller cancels.
//!
//! # Quick Start
//!
//! ```no_run
//! use oauth_device_flow::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> oauth_device_flow::error::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let client = DeviceFlowClient::new(config);
//! let cancel = CancellationToken::new();
//!
//! let authorization = client.request_device_authorization(&cancel).await?;
//! let token = client
//!     .poll_for_token(
//!         &authorization,
//!         &|auth: &DeviceAuthorization| println!("{}", auth.prompt()),
//!         &cancel,
//!     )
//!     .await?;
//! println!("{}", token.token_type);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod prelude;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
