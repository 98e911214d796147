//! Convenience re-exports for common use.

pub use crate::auth::presenter::{ChannelPresenter, StderrPresenter};
pub use crate::auth::{
    AuthorizationPresenter, DeviceAuthorization, DeviceCodePoll, DeviceFlowClient, PollPolicy,
    Token,
};
pub use crate::config::{ClientConfig, Provider};
pub use crate::error::{
    AuthorizationError, DeviceFlowError, ErrorCode, ExpiryReason, Result, TokenError,
};
