//! Inventory service API client.
//!
//! Plain HTTP plumbing shared by every console view: base URL
//! normalisation, error mapping and a generic JSON request helper. The typed
//! endpoint calls are in `remote`.

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Default timeout for API requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Connect failure, timeout, or any other transport-level problem.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("Invalid JSON from inventory service: {0}")]
    Decode(String),
    #[error("Invalid inventory service URL: {0}")]
    InvalidUrl(String),
    /// The owning view was dismounted before the response arrived.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the inventory service URL:
/// - ensure a scheme is present (http for localhost, https otherwise)
/// - strip trailing slashes
/// - strip a trailing `/api` segment
pub fn normalize_api_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    while url.ends_with('/') {
        url.pop();
    }

    if url.ends_with("/api") {
        url.truncate(url.len() - 4);
    }

    // "/api/" leaves a slash behind once the segment is gone
    while url.ends_with('/') {
        url.pop();
    }

    url
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn friendly_error(base: &str, err: &reqwest::Error) -> ApiError {
    let message = if err.is_connect() {
        format!("Cannot reach inventory service at {base}")
    } else if err.is_timeout() {
        format!("Connection to {base} timed out")
    } else if err.is_builder() {
        format!("Invalid inventory service URL: {base}")
    } else {
        format!("Network error communicating with {base}: {err}")
    };
    ApiError::Transport(message)
}

fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "Request rejected by inventory service".to_string(),
        404 => "Record not found".to_string(),
        422 => "Inventory service could not validate the request".to_string(),
        s if s >= 500 => "Inventory service error".to_string(),
        _ => "Unexpected response from inventory service".to_string(),
    }
}

/// Build the error for a non-success response, preferring the service's own
/// `detail` / `error` / `message` text over the generic status wording.
fn error_from_body(status: StatusCode, body_text: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body_text)
        .ok()
        .and_then(|json| {
            json.get("detail")
                .or_else(|| json.get("error"))
                .or_else(|| json.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| status_error(status));
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client bound to one inventory service deployment.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: String,
}

impl ApiClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = normalize_api_url(api_url);
        let parsed = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Join path segments onto the base URL. Segments are percent-encoded, so
    /// identifiers can be passed through untouched.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.base).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Perform a request and return the JSON body, or `Value::Null` for an
    /// empty response.
    pub async fn request<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        debug!(method = %method, url = %url, "inventory service request");

        let mut req = self.client.request(method.clone(), url.clone());
        if let Some(b) = body {
            req = req.json(b);
        }

        let start = Instant::now();
        let resp = req.send().await.map_err(|e| {
            let err = friendly_error(&self.base, &e);
            warn!(method = %method, url = %url, error = %err, "inventory service unreachable");
            err
        })?;
        let status = resp.status();
        let body_text = resp
            .text()
            .await
            .map_err(|e| friendly_error(&self.base, &e))?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let err = error_from_body(status, &body_text);
            warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                latency_ms,
                error = %err,
                "inventory service rejected request"
            );
            return Err(err);
        }

        debug!(method = %method, status = status.as_u16(), latency_ms, "inventory service response");
        if body_text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body_text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET and decode into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let value = self.request::<Value>(Method::GET, segments, None).await?;
        decode(value)
    }

    /// Send a JSON body and decode the response into `T`.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self.request(method, segments, Some(body)).await?;
        decode(value)
    }

    /// Send a request whose response body is irrelevant (message endpoints).
    pub async fn execute<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request(method, segments, body).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
