use std::time::Duration;

use mia_domain::MiaError;
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("mia/", env!("CARGO_PKG_VERSION"));

/// How often, and how patiently, a request is re-sent.
///
/// Only idempotent methods get more than one attempt. A `POST` creates
/// something on the backend, and a retry after a lost response would create
/// it twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_backoff: Duration::from_millis(200) }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn attempts_for(&self, method: &Method) -> usize {
        let idempotent =
            [Method::GET, Method::HEAD, Method::PUT, Method::DELETE, Method::OPTIONS]
                .contains(method);
        if idempotent {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    /// Delay before retry number `retry` (1-based): the base backoff doubled
    /// per earlier retry, capped at 2^8 times the base.
    #[must_use]
    pub fn delay(&self, retry: usize) -> Duration {
        let doublings = u32::try_from(retry.saturating_sub(1).min(8)).unwrap_or(8);
        self.base_backoff.saturating_mul(1 << doublings)
    }

    /// Worst-case wall time for one `method` request when each attempt may
    /// take up to `per_attempt`: every attempt plus the backoff between them.
    #[must_use]
    pub fn budget(&self, method: &Method, per_attempt: Duration) -> Duration {
        let attempts = self.attempts_for(method);
        let backoff = (1..attempts).fold(Duration::ZERO, |total, retry| total.saturating_add(self.delay(retry)));
        per_attempt
            .saturating_mul(u32::try_from(attempts).unwrap_or(u32::MAX))
            .saturating_add(backoff)
    }
}

/// reqwest client with a per-request timeout and [`RetryPolicy`].
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder`, retrying 5xx answers and transport failures as the
    /// policy allows. The last response is returned even if it is a 5xx.
    ///
    /// # Errors
    /// Returns `MiaError::Network` when the request cannot be built or every
    /// attempt failed at the transport level.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, MiaError> {
        let request = builder.build().map_err(|err| MiaError::from(InfraError::from(err)))?;
        let attempts = self.retry.attempts_for(request.method());

        let mut next = Some(request);
        let mut attempt = 0;
        while let Some(request) = next.take() {
            attempt += 1;
            let spare = if attempt < attempts { request.try_clone() } else { None };
            let (method, url) = (request.method().clone(), request.url().clone());

            match self.execute(request, attempt).await {
                Ok(response) if response.status().is_server_error() && spare.is_some() => {
                    warn!(attempt, %method, %url, status = %response.status(), "server error, retrying");
                }
                Ok(response) => return Ok(response),
                Err(err) if spare.is_some() && is_transient(&err) => {
                    warn!(attempt, %method, %url, error = %err, "transport error, retrying");
                }
                Err(err) => return Err(InfraError::from(err).into()),
            }

            tokio::time::sleep(self.retry.delay(attempt)).await;
            next = spare;
        }

        Err(MiaError::Internal("request could not be cloned for retry".into()))
    }

    async fn execute(&self, request: Request, attempt: usize) -> reqwest::Result<Response> {
        debug!(attempt, method = %request.method(), url = %request.url(), "sending HTTP request");
        let response = self.client.execute(request).await?;
        debug!(attempt, status = %response.status(), "received HTTP response");
        Ok(response)
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    retry: RetryPolicy,
}

impl HttpClientBuilder {
    /// Upper bound for a single attempt. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Total attempts (first try included) for idempotent requests.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    /// # Errors
    /// Returns `MiaError::Network` if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, MiaError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(30)))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| MiaError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, retry: self.retry })
    }
}
