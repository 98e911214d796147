//! HTTP collaborator used by the requesters.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use crate::error::Result;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can POST an `application/x-www-form-urlencoded` body.
///
/// Implementations surface network failures as `DeviceFlowError::Transport`
/// and must not retry; cancellation is applied by dropping the future.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        let resp = self
            .post(url)
            .header(ACCEPT, "application/json")
            .form(form)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        (**self).post_form(url, form).await
    }
}
