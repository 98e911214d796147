#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use oauth_device_flow::auth::{
    AuthorizationPresenter, DeviceAuthorization, DeviceFlowClient, HttpResponse, HttpTransport,
};
use oauth_device_flow::config::ClientConfig;
use oauth_device_flow::error::{DeviceFlowError, Result};
use serde_json::{json, Value};
use tokio::time::Instant;

/// A request seen by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub form: Vec<(String, String)>,
    pub at: Instant,
}

impl RecordedCall {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
enum Scripted {
    Reply {
        delay: Duration,
        response: HttpResponse,
    },
    Fail(String),
}

/// Replays canned responses in order. The last entry repeats forever.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: Value) -> &Self {
        self.reply_after(Duration::ZERO, status, body)
    }

    pub fn reply_after(&self, delay: Duration, status: u16, body: Value) -> &Self {
        self.push(Scripted::Reply {
            delay,
            response: HttpResponse::new(status, body.to_string()),
        })
    }

    pub fn pending(&self) -> &Self {
        self.reply(400, json!({ "error": "authorization_pending" }))
    }

    pub fn oauth_error(&self, status: u16, code: &str) -> &Self {
        self.reply(status, json!({ "error": code }))
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.push(Scripted::Fail(message.to_string()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    fn push(&self, entry: Scripted) -> &Self {
        self.script.lock().expect("script lock").push_back(entry);
        self
    }

    fn next(&self) -> Scripted {
        let mut script = self.script.lock().expect("script lock");
        let entry = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        entry.expect("no scripted response left")
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            url: url.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            at: Instant::now(),
        });
        match self.next() {
            Scripted::Reply { delay, response } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            Scripted::Fail(message) => Err(DeviceFlowError::transport(message)),
        }
    }
}

pub fn test_config(base: &str) -> ClientConfig {
    ClientConfig::builder()
        .client_id("oauth2dev-client-id")
        .device_authorization_url(format!("{base}/auth"))
        .token_url(format!("{base}/token"))
        .build()
}

pub fn scripted_client(
    transport: Arc<ScriptedTransport>,
) -> DeviceFlowClient<Arc<ScriptedTransport>> {
    DeviceFlowClient::with_transport(test_config("https://auth.example.com"), transport)
}

pub fn authorization(expires_in: u64, interval: u64) -> DeviceAuthorization {
    DeviceAuthorization {
        device_code: "GmRhmhcxhwAzkoEqiMEg_DnyEysNkuNhszIySk9eS".to_string(),
        user_code: "WDJB-MJHT".to_string(),
        verification_uri: "https://example.com/device".to_string(),
        verification_uri_complete: None,
        expires_in,
        interval,
    }
}

pub fn token_body(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600
    })
}

/// Presenter that remembers every invocation and when it happened.
#[derive(Default)]
pub struct RecordingPresenter {
    seen: Mutex<Vec<(String, Instant)>>,
}

impl RecordingPresenter {
    pub fn times_called(&self) -> usize {
        self.seen.lock().expect("presenter lock").len()
    }

    pub fn first_call(&self) -> Option<(String, Instant)> {
        self.seen.lock().expect("presenter lock").first().cloned()
    }
}

impl AuthorizationPresenter for RecordingPresenter {
    fn present(&self, authorization: &DeviceAuthorization) {
        self.seen
            .lock()
            .expect("presenter lock")
            .push((authorization.user_code.clone(), Instant::now()));
    }
}
