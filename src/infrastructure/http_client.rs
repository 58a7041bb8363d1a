//! HTTP client for the upstream archive with rate limiting and error handling
//!
//! One request per logical query; no retries here. Callers use
//! [`KoreansoolError::is_recoverable`] to decide about retrying.

#![allow(clippy::uninlined_format_args)]

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use governor::{
    clock::DefaultClock,
    state::{direct::NotKeyed, InMemoryState},
    Quota, RateLimiter,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
    Client, RequestBuilder, Response,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::UpstreamConfig;
use super::error::{KoreansoolError, KoreansoolResult};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// HTTP client configuration
#[derive(Debug, Clone, serde::Serialize)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_seconds: u64,
    pub max_requests_per_second: u32,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&UpstreamConfig::default())
    }
}

impl From<&UpstreamConfig> for HttpClientConfig {
    fn from(upstream: &UpstreamConfig) -> Self {
        Self {
            user_agent: upstream.user_agent.clone(),
            accept_language: upstream.accept_language.clone(),
            timeout_seconds: upstream.timeout_seconds,
            max_requests_per_second: upstream.max_requests_per_second,
        }
    }
}

/// Rate-limited HTTP client; every request can be cancelled through one token
pub struct HttpClient {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    cancellation: CancellationToken,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).context("Invalid accept language")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second).context("Rate limit must be greater than 0")?,
        );

        Ok(Self {
            client,
            rate_limiter: RateLimiter::direct(quota),
            cancellation: CancellationToken::new(),
        })
    }

    /// Share an externally owned token (e.g. cancelled on Ctrl-C)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// GET with query parameters, body as text
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> KoreansoolResult<String> {
        let response = self.send(url, self.client.get(url).query(query)).await?;
        self.read_text(url, response).await
    }

    /// POST `application/x-www-form-urlencoded`, body as text
    pub async fn post_form_text(&self, url: &str, form: &[(&str, String)]) -> KoreansoolResult<String> {
        let response = self.send(url, self.client.post(url).form(form)).await?;
        self.read_text(url, response).await
    }

    /// GET with query parameters, raw body
    pub async fn get_bytes(&self, url: &str, query: &[(&str, String)]) -> KoreansoolResult<Vec<u8>> {
        let response = self.send(url, self.client.get(url).query(query)).await?;

        let bytes = tokio::select! {
            result = response.bytes() => result.map_err(|e| KoreansoolError::upstream_body(url, &e))?,
            () = self.cancellation.cancelled() => return Err(KoreansoolError::cancelled(url)),
        };

        debug!("Successfully fetched: {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> KoreansoolResult<Response> {
        if self.cancellation.is_cancelled() {
            return Err(KoreansoolError::cancelled(url));
        }

        tokio::select! {
            () = self.rate_limiter.until_ready() => {},
            () = self.cancellation.cancelled() => return Err(KoreansoolError::cancelled(url)),
        }

        info!("Fetching URL: {}", url);

        let response = tokio::select! {
            result = request.send() => result.map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                KoreansoolError::upstream_request(url, &e)
            })?,
            () = self.cancellation.cancelled() => {
                warn!("🛑 HTTP request cancelled for URL: {}", url);
                return Err(KoreansoolError::cancelled(url));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP request failed with status {}: {}", status, url);
            return Err(KoreansoolError::upstream_status(status.as_u16(), url));
        }

        Ok(response)
    }

    async fn read_text(&self, url: &str, response: Response) -> KoreansoolResult<String> {
        let text = tokio::select! {
            result = response.text() => result.map_err(|e| KoreansoolError::upstream_body(url, &e))?,
            () = self.cancellation.cancelled() => {
                warn!("🛑 Response reading cancelled for URL: {}", url);
                return Err(KoreansoolError::cancelled(url));
            }
        };

        debug!("Successfully fetched: {} ({} chars)", url, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_client_creation() {
        let client = HttpClient::new(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_zero_rate_limit_is_rejected() {
        let config = HttpClientConfig {
            max_requests_per_second: 0,
            ..Default::default()
        };
        assert!(HttpClient::new(config).is_err());
    }

    #[tokio::test]
    async fn test_cancelled_client_does_not_send() {
        let token = CancellationToken::new();
        let client = HttpClient::new(HttpClientConfig::default())
            .unwrap()
            .with_cancellation(token.clone());
        token.cancel();

        let result = client.get_text("http://127.0.0.1:9/never", &[]).await;
        assert!(matches!(result, Err(KoreansoolError::Cancelled { .. })));
    }
}
