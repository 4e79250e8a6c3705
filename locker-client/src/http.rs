//! Thin JSON-over-HTTP wrapper around the locker REST API.
//!
//! Every backend response is wrapped in the same envelope:
//!
//! ```json
//! { "success": true, "data": { ... } }
//! { "success": false, "error": "otp expired", "error_code": "OTP_EXPIRED" }
//! ```
//!
//! [`HttpClient`] attaches the bearer token, sends the request, unwraps the
//! envelope and decodes `data` into the caller's type.

use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ApiError, ApiResult, ErrorCode};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Header carrying the short-lived credential issued by pickup OTP verification
pub const PICKUP_TOKEN_HEADER: &str = "X-Pickup-Token";

/// Standard response envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<T>,
    /// Usually a string, but the backend types it loosely
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl<T> Envelope<T> {
    fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::String(_) | Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
            .as_deref()
            .filter(|c| !c.is_empty())
            .and_then(|c| c.parse().ok())
    }

    /// Unwrap a 2xx envelope.
    ///
    /// Returns the `data` field (possibly absent) when `success` is true, the
    /// reported error when it is false, and a contract error when the flag is
    /// missing altogether.
    pub fn into_data(self) -> ApiResult<Option<T>> {
        match self.success {
            Some(true) => Ok(self.data),
            Some(false) => Err(ApiError::Api {
                status: None,
                code: self.error_code(),
                message: self
                    .error_message()
                    .unwrap_or_else(|| "Request failed".to_string()),
            }),
            None => Err(ApiError::InvalidContract),
        }
    }
}

/// Client for the locker REST API
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    /// Shared with every clone so a login in one store is seen by all others
    access_token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Create a new client for `base_url` (e.g. `http://localhost:8080/api/v1`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; relative paths are joined to the base URL
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn set_access_token(&self, token: Option<String>) {
        let mut slot = self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = token;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<(), T>(Method::GET, path, None, &[]).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, Some(body), &[]).await
    }

    /// POST without a body where the envelope carries no `data`
    pub async fn post_unit(&self, path: &str) -> ApiResult<()> {
        self.request_unit::<()>(Method::POST, path, None, &[]).await
    }

    /// Send a request and decode the envelope's `data` into `T`.
    ///
    /// A successful envelope without `data` is [`ApiError::InvalidResponse`].
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self
            .send(method, path, body, headers)
            .await?
            .ok_or(ApiError::InvalidResponse)?;

        serde_json::from_value(data).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Send a request whose successful envelope may omit `data`
    pub async fn request_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, body, headers).await.map(|_| ())
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> ApiResult<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path);
        tracing::debug!("📡 {} {}", method, url);

        let mut builder = self
            .client
            .request(method.clone(), url.as_str())
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.access_token() {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        // An unparsable body is treated like an empty one
        let body: Option<Value> = serde_json::from_str(&text).ok();

        tracing::debug!("📦 {} {} -> {}", method, url, status);

        if !status.is_success() {
            return Err(error_from_status(status, body));
        }

        let envelope: Envelope<Value> = match body {
            Some(value) => {
                serde_json::from_value(value).map_err(|_| ApiError::InvalidContract)?
            }
            None => return Err(ApiError::InvalidContract),
        };

        envelope.into_data()
    }
}

fn error_from_status(status: StatusCode, body: Option<Value>) -> ApiError {
    let envelope: Envelope<Value> = body
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    let code = if status == StatusCode::UNAUTHORIZED {
        Some(ErrorCode::Unauthorized)
    } else {
        envelope.error_code()
    };

    let message = envelope
        .error_message()
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Request failed".to_string());

    tracing::warn!("❌ Request failed with status {}: {}", status, message);

    ApiError::Api {
        status: Some(status.as_u16()),
        code,
        message,
    }
}

/// Percent-encode a value used as a single path segment
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
