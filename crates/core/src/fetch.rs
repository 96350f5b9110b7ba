//! Retrieval of listing page markup.
//!
//! The record assembler does not care where markup comes from, so retrieval
//! sits behind the [`PageSource`] trait. [`HttpSource`] fetches the live page;
//! [`FileSource`] replays a page saved to disk.

use std::fs;
use std::future::Future;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{HeatwatchError, Result};

/// HTTP client configuration for fetching listing pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (compatible; Heatwatch/1.0)"
                .to_string(),
        }
    }
}

/// Something that can produce the markup of one listing page.
pub trait PageSource {
    /// Returns the full page markup.
    ///
    /// Failures are page-level faults and are returned to the caller as is.
    fn fetch_page(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Fetches the live listing page over HTTP.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpSource {
    /// Validates `url` and prepares a source for it.
    pub fn new(url: &str, config: FetchConfig) -> Result<Self> {
        Ok(Self { url: parse_url(url)?, config })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[cfg(feature = "fetch")]
impl PageSource for HttpSource {
    async fn fetch_page(&self) -> Result<String> {
        fetch_url(self.url.as_str(), &self.config).await
    }
}

/// Replays a listing page saved to disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for FileSource {
    async fn fetch_page(&self) -> Result<String> {
        fetch_file(&self.path)
    }
}

/// Markup held in memory, mostly useful in tests and benchmarks.
#[derive(Debug, Clone)]
pub struct StaticSource(pub String);

impl PageSource for StaticSource {
    async fn fetch_page(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(feature = "fetch")]
fn parse_url(url: &str) -> Result<Url> {
    let parsed_url = Url::parse(url).map_err(|e| HeatwatchError::InvalidUrl(e.to_string()))?;

    match parsed_url.scheme() {
        "http" | "https" => Ok(parsed_url),
        other => Err(HeatwatchError::InvalidUrl(format!(
            "unsupported scheme `{}`; expected http:// or https://",
            other
        ))),
    }
}

/// Fetches HTML content from a URL.
///
/// Performs an HTTP GET request and returns the response body as text. It
/// follows redirects, respects the configured timeout and turns non-success
/// statuses into [`HeatwatchError::HttpStatus`].
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(HeatwatchError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-GB,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                HeatwatchError::Timeout { timeout: config.timeout }
            } else {
                HeatwatchError::HttpError(e)
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HeatwatchError::HttpStatus { status: status.as_u16() });
    }

    let content = response.text().await?;

    Ok(content)
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: impl Into<PathBuf>) -> Result<String> {
    let path_buf = path.into();

    if !path_buf.exists() {
        Err(HeatwatchError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(HeatwatchError::from)
    }
}
