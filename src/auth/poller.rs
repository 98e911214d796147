//! RFC 8628 §3.5 polling loop.
//!
//! The server paces the client: the loop never issues a token request sooner
//! than the current interval after the previous one, grows the interval on
//! `slow_down`, and stops at the first answer outside the pacing vocabulary.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::DeviceFlowClient;
use super::device_code::{DeviceCodePoll, DEFAULT_INTERVAL_SECS};
use super::presenter::AuthorizationPresenter;
use super::response::TokenReply;
use super::transport::HttpTransport;
use super::{DeviceAuthorization, Token};
use crate::error::{DeviceFlowError, ErrorCode, ExpiryReason, Result};
use crate::util::cancel::cancellable_sleep_until;

/// Longest single wait. Larger intervals are clamped to it.
const MAX_WAIT: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Pacing knobs for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Used when the authorization carries no interval.
    pub default_interval: Duration,
    /// Added to the interval on every `slow_down`.
    pub slow_down_increment: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            default_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            slow_down_increment: Duration::from_secs(5),
        }
    }
}

impl PollPolicy {
    pub fn initial_interval(&self, authorization: &DeviceAuthorization) -> Duration {
        if authorization.interval == 0 {
            self.default_interval
        } else {
            authorization.interval()
        }
    }

    /// Interval after a `slow_down`. Never shrinks.
    pub fn slowed(&self, current: Duration, server_interval: Option<u64>) -> Duration {
        let bumped = current.saturating_add(self.slow_down_increment);
        server_interval.map_or(bumped, |secs| bumped.max(Duration::from_secs(secs)))
    }
}

impl<T: HttpTransport> DeviceFlowClient<T> {
    /// One token request, classified into the device flow vocabulary.
    ///
    /// Token errors other than the four RFC 8628 §3.5 codes are returned as
    /// `Err(DeviceFlowError::Token)`.
    pub async fn poll_once(
        &self,
        device_code: &str,
        cancel: &CancellationToken,
    ) -> Result<DeviceCodePoll> {
        let (error, interval) = match self.token_reply(device_code, cancel).await? {
            TokenReply::Granted(token) => return Ok(DeviceCodePoll::Authorized { token }),
            TokenReply::Rejected { error, interval } => (error, interval),
        };
        match error.code() {
            Some(ErrorCode::AuthorizationPending) => Ok(DeviceCodePoll::Pending),
            Some(ErrorCode::SlowDown) => Ok(DeviceCodePoll::SlowDown {
                server_interval: interval,
            }),
            Some(ErrorCode::AccessDenied) => Ok(DeviceCodePoll::AccessDenied(error)),
            Some(ErrorCode::ExpiredToken) => Ok(DeviceCodePoll::Expired(error)),
            _ => Err(DeviceFlowError::Token(error)),
        }
    }

    /// Poll the token endpoint until the user finishes, the code expires,
    /// the server refuses, or `cancel` fires.
    ///
    /// `presenter` is invoked once before the first wait. With a non-zero
    /// `expires_in` the loop gives up at that deadline without waiting for
    /// the server to say `expired_token`.
    pub async fn poll_for_token<P>(
        &self,
        authorization: &DeviceAuthorization,
        presenter: &P,
        cancel: &CancellationToken,
    ) -> Result<Token>
    where
        P: AuthorizationPresenter + ?Sized,
    {
        presenter.present(authorization);

        // an expiry too far out to represent is no deadline at all
        let deadline = authorization
            .expires_in()
            .and_then(|ttl| Instant::now().checked_add(ttl));
        let mut interval = self.policy.initial_interval(authorization);
        let mut attempt: u32 = 0;
        info!(
            interval_secs = interval.as_secs(),
            expires_in = authorization.expires_in,
            "Waiting for device authorization"
        );

        loop {
            let now = Instant::now();
            if deadline.is_some_and(|deadline| now >= deadline) {
                warn!(attempts = attempt, "Device code expired before authorization");
                return Err(DeviceFlowError::Expired {
                    reason: ExpiryReason::Deadline,
                });
            }

            let wake = now + interval.min(MAX_WAIT);
            let wake = deadline.map_or(wake, |deadline| wake.min(deadline));
            if let Err(err) = cancellable_sleep_until(cancel, wake).await {
                debug!(attempts = attempt, "Device flow cancelled while waiting");
                return Err(err);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                continue;
            }

            attempt += 1;
            debug!(attempt, interval_secs = interval.as_secs(), "Polling token endpoint");
            let poll = match self.poll_once(&authorization.device_code, cancel).await {
                Ok(poll) => poll,
                Err(err) if err.is_cancelled() => {
                    debug!(attempt, "Device flow cancelled during token request");
                    return Err(err);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "Device flow failed");
                    return Err(err);
                }
            };

            match poll {
                DeviceCodePoll::Authorized { token } => {
                    info!(attempt, "Device authorization complete");
                    return Ok(token);
                }
                DeviceCodePoll::Pending => {}
                DeviceCodePoll::SlowDown { server_interval } => {
                    interval = self.policy.slowed(interval, server_interval);
                    warn!(
                        attempt,
                        interval_secs = interval.as_secs(),
                        "Server asked to slow down"
                    );
                }
                DeviceCodePoll::AccessDenied(error) => {
                    warn!(attempt, "Device authorization denied");
                    return Err(DeviceFlowError::AccessDenied(error));
                }
                DeviceCodePoll::Expired(error) => {
                    warn!(attempt, "Server reported the device code expired");
                    return Err(DeviceFlowError::Expired {
                        reason: ExpiryReason::Server(error),
                    });
                }
            }
        }
    }

    /// Request a device authorization, then poll it to completion.
    pub async fn get_token<P>(&self, presenter: &P, cancel: &CancellationToken) -> Result<Token>
    where
        P: AuthorizationPresenter + ?Sized,
    {
        let authorization = self.request_device_authorization(cancel).await?;
        self.poll_for_token(&authorization, presenter, cancel).await
    }
}
