//! Surfacing the user code and verification URL.

use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;

use super::DeviceAuthorization;

/// Shows a fresh device authorization to the user.
///
/// The poller calls `present` exactly once, before the first token request.
/// It runs synchronously on the polling task, so it should return promptly.
pub trait AuthorizationPresenter: Send + Sync {
    fn present(&self, authorization: &DeviceAuthorization);
}

impl<F> AuthorizationPresenter for F
where
    F: Fn(&DeviceAuthorization) + Send + Sync,
{
    fn present(&self, authorization: &DeviceAuthorization) {
        self(authorization)
    }
}

/// Prints the prompt to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrPresenter;

impl AuthorizationPresenter for StderrPresenter {
    fn present(&self, authorization: &DeviceAuthorization) {
        eprintln!("{}", authorization.prompt());
    }
}

/// Hands the authorization to another task through a oneshot channel.
///
/// # Example
/// ```
/// use oauth_device_flow::auth::presenter::{AuthorizationPresenter, ChannelPresenter};
/// use oauth_device_flow::auth::DeviceAuthorization;
///
/// let (presenter, mut rx) = ChannelPresenter::new();
/// let authorization = DeviceAuthorization {
///     device_code: "d".to_string(),
///     user_code: "ABCD-EFGH".to_string(),
///     verification_uri: "https://example.com/device".to_string(),
///     verification_uri_complete: None,
///     expires_in: 600,
///     interval: 5,
/// };
/// presenter.present(&authorization);
/// assert_eq!(rx.try_recv().unwrap().user_code, "ABCD-EFGH");
/// ```
#[derive(Debug)]
pub struct ChannelPresenter {
    sender: Mutex<Option<oneshot::Sender<DeviceAuthorization>>>,
}

impl ChannelPresenter {
    pub fn new() -> (Self, oneshot::Receiver<DeviceAuthorization>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sender: Mutex::new(Some(tx)),
            },
            rx,
        )
    }
}

impl AuthorizationPresenter for ChannelPresenter {
    fn present(&self, authorization: &DeviceAuthorization) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tx) = sender {
            // receiver may have gone away; the flow carries on regardless
            let _ = tx.send(authorization.clone());
        }
    }
}
