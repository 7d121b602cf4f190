//! HTTP transport for the Gmail REST API.

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Base URL of the Gmail REST API.
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// An authenticated API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path below [`GMAIL_API_BASE`], including the query string.
    pub path: String,
    /// Bearer token sent in the `Authorization` header.
    pub access_token: String,
    /// JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            access_token: access_token.into(),
            body: None,
        }
    }

    /// Creates a `POST` request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, access_token: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            access_token: access_token.into(),
            body: Some(body),
        }
    }
}

/// Raw answer to an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Status reason phrase.
    pub reason: String,
    /// Response body.
    pub body: String,
}

impl ApiResponse {
    /// Creates a `200 OK` response with the given body.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Carries API requests to the provider.
pub trait MailTransport: Send + Sync + 'static {
    /// Sends a request and returns the response, whatever its status.
    ///
    /// Only failures to obtain a response at all are errors.
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// [`MailTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Creates a transport for the public Gmail API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(GMAIL_API_BASE)
    }

    /// Creates a transport for another API root.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl MailTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = ?request.method, %url, "Gmail API request");

        let builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        let builder = builder.bearer_auth(&request.access_token);
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Network error: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("Network error: {e}")))?;

        Ok(ApiResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
