//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::types::{SearchRequest, UpdateRequest};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resume search service client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ResumeClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl std::fmt::Debug for ResumeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumeClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

impl ResumeClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Endpoints
    // ─────────────────────────────────────────────────────────────────────────

    /// Search resumes.
    pub async fn search(&self, request: &SearchRequest) -> Result<Value> {
        self.post(&["search"], request).await
    }

    /// Fetch one resume by candidate id.
    ///
    /// Returns [`Error::NotFound`] when the service has no such candidate.
    pub async fn get(&self, candidate_id: &str) -> Result<Value> {
        self.get_json(&["resume", candidate_id]).await
    }

    /// Update resume fields.
    ///
    /// Returns [`Error::NotFound`] when the candidate does not exist and
    /// `upsert` is off.
    pub async fn update(&self, request: &UpdateRequest) -> Result<Value> {
        self.post(&["update"], request).await
    }

    /// Service health document.
    pub async fn health(&self) -> Result<Value> {
        self.get_json(&["health"]).await
    }

    /// Simple connectivity check.
    pub async fn is_healthy(&self) -> bool {
        self.health().await.is_ok()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL from path segments, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(&self, segments: &[&str]) -> Result<Value> {
        let url = self.url(segments);
        debug!(url = %url, "GET");
        let response = self
            .inner
            .http
            .get(url)
            .timeout(self.inner.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.handle_response(response, segments).await
    }

    async fn post<B>(&self, segments: &[&str], body: &B) -> Result<Value>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(segments);
        debug!(url = %url, "POST");
        let response = self
            .inner
            .http
            .post(url)
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.handle_response(response, segments).await
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.inner.timeout)
        } else if err.is_connect() {
            Error::Connect {
                base_url: self.inner.base_url.as_str().trim_end_matches('/').to_string(),
                source: err,
            }
        } else {
            Error::Http(err)
        }
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response(&self, response: reqwest::Response, segments: &[&str]) -> Result<Value> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }
        if status.as_u16() == 404 {
            return Err(Error::NotFound(segments.join("/")));
        }
        Err(Error::api(status.as_u16(), &text))
    }
}

/// Builder for creating a [`ResumeClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL of the service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ResumeClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        let mut base_url = Url::parse(base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("'{}' cannot be a base URL", base_url)));
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("scout-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(ResumeClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
