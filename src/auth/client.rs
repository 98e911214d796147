//! Device authorization and token requesters.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::poller::PollPolicy;
use super::response::{parse_device_authorization, parse_token_reply, TokenReply};
use super::transport::HttpTransport;
use super::{DeviceAuthorization, Token};
use crate::config::ClientConfig;
use crate::error::{DeviceFlowError, Result};
use crate::util::cancel::with_cancellation;

/// `grant_type` for device access token requests (RFC 8628 §3.4).
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// OAuth client for the device authorization grant.
///
/// # Example
/// ```no_run
/// use oauth_device_flow::auth::presenter::StderrPresenter;
/// use oauth_device_flow::auth::DeviceFlowClient;
/// use oauth_device_flow::config::{ClientConfig, Provider};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> oauth_device_flow::error::Result<()> {
/// let config = ClientConfig::for_provider(Provider::Google, "client-id")
///     .with_client_secret("client-secret")
///     .with_scopes(["email"]);
/// let client = DeviceFlowClient::new(config);
/// let token = client
///     .get_token(&StderrPresenter, &CancellationToken::new())
///     .await?;
/// println!("{}", token.token_type);
/// # Ok(())
/// # }
/// ```
pub struct DeviceFlowClient<T = reqwest::Client> {
    pub(crate) config: ClientConfig,
    pub(crate) transport: T,
    pub(crate) policy: PollPolicy,
}

impl DeviceFlowClient<reqwest::Client> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, reqwest::Client::new())
    }
}

impl<T: HttpTransport> DeviceFlowClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            policy: PollPolicy::default(),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Ask the authorization server for a device and user code (RFC 8628 §3.1).
    ///
    /// Single attempt. OAuth errors come back as `DeviceFlowError::Authorization`.
    pub async fn request_device_authorization(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DeviceAuthorization> {
        let scope = self.config.scope_param();
        let mut form = vec![("client_id", self.config.client_id.as_str())];
        if let Some(scope) = scope.as_deref() {
            form.push(("scope", scope));
        }

        debug!(
            url = %self.config.device_authorization_url,
            client_id = %self.config.client_id,
            "Requesting device authorization"
        );
        let resp = with_cancellation(
            cancel,
            self.transport
                .post_form(&self.config.device_authorization_url, &form),
        )
        .await?;

        let authorization = parse_device_authorization(&resp)?;
        debug!(
            user_code = %authorization.user_code,
            verification_uri = %authorization.verification_uri,
            expires_in = authorization.expires_in,
            interval = authorization.interval,
            "Device authorization granted"
        );
        Ok(authorization)
    }

    /// Exchange a device code for a token, once (RFC 8628 §3.4).
    ///
    /// Every OAuth error, including `authorization_pending` and `slow_down`,
    /// is returned as `DeviceFlowError::Token`.
    pub async fn request_token(&self, device_code: &str, cancel: &CancellationToken) -> Result<Token> {
        match self.token_reply(device_code, cancel).await? {
            TokenReply::Granted(token) => Ok(token),
            TokenReply::Rejected { error, .. } => Err(DeviceFlowError::Token(error)),
        }
    }

    pub(crate) async fn token_reply(
        &self,
        device_code: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenReply> {
        let mut form = vec![
            ("grant_type", DEVICE_CODE_GRANT_TYPE),
            ("device_code", device_code),
            ("client_id", self.config.client_id.as_str()),
        ];
        // public clients must not send the key at all
        if let Some(secret) = self.config.client_secret() {
            form.push(("client_secret", secret));
        }

        let resp = with_cancellation(
            cancel,
            self.transport.post_form(&self.config.token_url, &form),
        )
        .await?;
        parse_token_reply(&resp)
    }
}
