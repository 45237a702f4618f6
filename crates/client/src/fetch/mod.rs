//! HTTP fetch primitive shared by the icon cache and the message handlers.
//!
//! ### URL Canonicalization
//! - Trim whitespace, ensure scheme (default: `https`)
//! - Lowercase host, remove fragments
//! - Preserve query string
//!
//! ### Responses
//! - Redirects are followed (max 5 by default); the final URL is reported.
//! - Every HTTP status is returned as a response. Only transport failures
//!   (DNS, refused connections, timeouts, oversized bodies) are errors.
//! - The body is kept as raw bytes; text decoding lives in [`charset`].

pub mod charset;
pub mod url;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use self::charset::decode_text;
pub use reqwest::{StatusCode, Url};
pub use self::url::{UrlError, canonicalize, was_redirected};

use favcache_core::{AppConfig, Error, HeaderFields};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "favcache/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 1MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "favcache/0.1".to_string(),
            max_bytes: 1024 * 1024,
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested, canonicalized
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Response headers
    pub headers: HeaderFields,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Whether the origin redirected the request elsewhere.
    pub fn redirected(&self) -> bool {
        was_redirected(&self.url, &self.final_url)
    }
}

/// Network fetch with redirect following.
///
/// The icon cache and message handlers only depend on this trait, so tests
/// can substitute an in-process origin.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error>;
}

/// HTTP fetch client backed by reqwest.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning raw bytes and metadata regardless of status.
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = canonicalize(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "image/avif,image/webp,image/*,*/*;q=0.8")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();

        if let Some(len) = response.content_length()
            && exceeds(len, self.config.max_bytes)
        {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                len, self.config.max_bytes
            )));
        }

        let final_url = response.url().clone();
        let headers: HeaderFields = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
            .collect();

        let bytes = response.bytes().await.map_err(transport_error)?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        let content_type = headers.content_type().map(str::to_string);
        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} ({}) in {}ms ({} bytes)",
            url,
            final_url,
            status.as_u16(),
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse { url, final_url, status, content_type, bytes, headers, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        FetchClient::fetch(self, url).await
    }
}

/// Whether a declared body length is over `max`. Lengths that do not fit in
/// `usize` always are.
fn exceeds(len: u64, max: usize) -> bool {
    usize::try_from(len).map_or(true, |len| len > max)
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(err.to_string())
    } else {
        Error::Transport(format!("network error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "favcache/0.1");
        assert_eq!(config.max_bytes, 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "ua/2".into(), max_redirects: 2, timeout_ms: 500, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "ua/2");
        assert_eq!(config.max_redirects, 2);
        assert_eq!(config.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_redirected_response() {
        let response = FetchResponse {
            url: Url::parse("https://example.com/favicon.ico").unwrap(),
            final_url: Url::parse("https://cdn.example.com/fav.ico").unwrap(),
            status: StatusCode::OK,
            content_type: Some("image/x-icon".to_string()),
            bytes: Bytes::new(),
            headers: HeaderFields::new(),
            fetch_ms: 100,
        };

        assert!(response.redirected());
        assert_eq!(response.final_url.as_str(), "https://cdn.example.com/fav.ico");
    }

    #[test]
    fn test_declared_length_limit() {
        assert!(!exceeds(1024, 1024));
        assert!(exceeds(1025, 1024));
        assert!(exceeds(u64::MAX, usize::MAX - 1));
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.fetch("ftp://example.com/favicon.ico").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
