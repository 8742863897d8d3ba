//! API client for the Mia backend
//!
//! Every request carries `Content-Type: application/json` and, when a token
//! is available, `Authorization: Bearer <token>`. Error bodies of the form
//! `{ "error": "..." }` become the error message.

use std::sync::Arc;
use std::time::Duration;

use mia_domain::ApiConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://console.getmia.live/api")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
        }
    }
}

/// Authenticated JSON client for the Mia backend
pub struct ApiClient {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP transport cannot be built.
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("cannot build HTTP transport: {e}")))?;

        Ok(Self { http, auth, config })
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None, &[]).await
    }

    /// GET with extra request headers, e.g. `X-OAuth-State`.
    #[instrument(skip(self, headers), fields(path = %path))]
    pub async fn get_with_headers<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None, headers).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        self.post_with_headers(path, body, &[]).await
    }

    /// POST with extra request headers, e.g. `Idempotency-Key`.
    #[instrument(skip(self, body, headers), fields(path = %path))]
    pub async fn post_with_headers<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
        headers: &[(&str, &str)],
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("request body is not serializable: {e}")))?;
        self.execute(Method::POST, path, Some(body), headers).await
    }

    /// DELETE; whatever the backend answers with is discarded.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: Value = self.execute(Method::DELETE, path, None, &[]).await?;
        Ok(())
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Result<R, ApiError> {
        let url = format!("{}{path}", self.config.base_url);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.auth.access_token().await? {
            request = request.bearer_auth(token);
        }
        for &(name, value) in headers {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        debug!(%method, %url, "API request");
        let limit = self.http.retry_policy().budget(&method, self.config.timeout);
        let response = tokio::time::timeout(limit, self.http.send(request))
            .await
            .map_err(|_| ApiError::Timeout(limit))?
            .map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &url, &text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("response body could not be read: {e}")))?;
        let decoded = decode_body(status, &bytes)?;
        info!(%method, path, status = status.as_u16(), "API request successful");
        Ok(decoded)
    }
}

/// 204/205 and empty bodies decode as JSON `null`, so `()` and `Option<T>`
/// accept them.
fn decode_body<R: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<R, ApiError> {
    if bytes.is_empty() || status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return serde_json::from_value(Value::Null).map_err(|_| {
            ApiError::Client(format!("status {} carried no body where one was expected", status.as_u16()))
        });
    }
    serde_json::from_slice(bytes)
        .map_err(|e| ApiError::Client(format!("unexpected response shape: {e}")))
}

fn status_error(status: StatusCode, url: &str, body: &str) -> ApiError {
    let message = match backend_error_message(body) {
        Some(message) => message,
        None if body.is_empty() => format!("{url} returned status {status}"),
        None => format!("{url} returned status {status}: {body}"),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit(message),
        s if s.is_server_error() => ApiError::Server(message),
        s if s.is_client_error() => ApiError::Client(message),
        _ => ApiError::Network(message),
    }
}

/// Extract `error` from a `{ "error": "..." }` body.
fn backend_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().filter(|m| !m.is_empty()).map(str::to_string)
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// # Errors
    /// Returns `ApiError::Config` without a token provider.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let auth = self.auth.ok_or_else(|| ApiError::Config("token provider not set".into()))?;
        ApiClient::new(self.config.unwrap_or_default(), auth)
    }
}
