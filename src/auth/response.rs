//! Interpreting endpoint responses.

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::transport::HttpResponse;
use super::{DeviceAuthorization, Token};
use crate::error::{AuthorizationError, DeviceFlowError, Result, TokenError};

/// RFC 6749 §5.2 error document. `interval` is what some servers attach to `slow_down`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_uri: Option<String>,
    #[serde(default, deserialize_with = "lenient_interval")]
    interval: Option<u64>,
}

/// Accepts `15` or `"15"`. Anything else is ignored rather than failing the body.
fn lenient_interval<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Token endpoint answer before the poller interprets it.
#[derive(Debug)]
pub(crate) enum TokenReply {
    Granted(Token),
    Rejected {
        error: TokenError,
        interval: Option<u64>,
    },
}

fn error_body(body: &str) -> Option<ErrorBody> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .filter(|err| !err.error.is_empty())
}

fn unexpected_status(endpoint: &str, resp: &HttpResponse) -> DeviceFlowError {
    DeviceFlowError::Parse(format!(
        "{endpoint} endpoint answered status {} without an OAuth error body",
        resp.status
    ))
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(DeviceFlowError::Parse(format!("{field} is empty")));
    }
    Ok(())
}

pub(crate) fn parse_device_authorization(resp: &HttpResponse) -> Result<DeviceAuthorization> {
    if let Some(err) = error_body(&resp.body) {
        let mut error = AuthorizationError::new(resp.status, err.error).with_body(resp.body.as_str());
        error.error_description = err.error_description;
        error.error_uri = err.error_uri;
        return Err(error.into());
    }
    if !resp.is_success() {
        return Err(unexpected_status("device authorization", resp));
    }
    let authorization: DeviceAuthorization = serde_json::from_str(&resp.body)?;
    require_non_empty("device_code", &authorization.device_code)?;
    require_non_empty("user_code", &authorization.user_code)?;
    require_non_empty("verification_uri", &authorization.verification_uri)?;
    Ok(authorization.normalized())
}

pub(crate) fn parse_token_reply(resp: &HttpResponse) -> Result<TokenReply> {
    if let Some(err) = error_body(&resp.body) {
        let mut error = TokenError::new(resp.status, err.error).with_body(resp.body.as_str());
        error.error_description = err.error_description;
        error.error_uri = err.error_uri;
        return Ok(TokenReply::Rejected {
            error,
            interval: err.interval,
        });
    }
    if !resp.is_success() {
        return Err(unexpected_status("token", resp));
    }
    let token: Token = serde_json::from_str(&resp.body)?;
    require_non_empty("access_token", &token.access_token)?;
    Ok(TokenReply::Granted(token.stamp_expiry(Utc::now())))
}
