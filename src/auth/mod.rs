//! OAuth 2.0 Device Authorization Grant (RFC 8628).

pub mod client;
pub mod device_code;
pub mod poller;
pub mod presenter;
pub(crate) mod response;
pub mod token;
pub mod transport;

pub use client::DeviceFlowClient;
pub use device_code::{DeviceAuthorization, DeviceCodePoll};
pub use poller::PollPolicy;
pub use presenter::AuthorizationPresenter;
pub use token::Token;
pub use transport::{HttpResponse, HttpTransport};
