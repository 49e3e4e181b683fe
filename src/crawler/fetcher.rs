//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building one isolated HTTP client per fetch session
//! - GET requests to fetch page content
//! - Redirect limits and timeouts
//! - Error classification into `FetchOutcome::Failure`

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::parse_html;
use crate::links::LinkSet;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Opaque token isolating one fetch's connection and cookie state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Builds the identifier of the `index`-th URL of scheduler run `run`
    pub fn new(run: u64, index: usize) -> Self {
        Self(format!("session-{}-{}", run, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One URL to fetch, bound to its own session
#[derive(Debug, Clone)]
pub struct FetchTarget {
    pub url: String,
    pub session: SessionId,
}

impl FetchTarget {
    pub fn new(url: impl Into<String>, session: SessionId) -> Self {
        Self {
            url: url.into(),
            session,
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page title (if present)
    pub title: Option<String>,
    /// Raw response body
    pub html: String,
    /// Markdown rendering of the body
    pub content: String,
    /// Outbound links, split by origin
    pub links: LinkSet,
}

/// Why a fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The address could not be parsed
    InvalidUrl,
    /// DNS, connect, TLS or redirect failure
    Network,
    /// The request or the per-fetch deadline expired
    Timeout,
    /// The server answered with a non-success status
    HttpStatus(u16),
    /// The body could not be read
    Body,
    /// The fetch task panicked
    Panicked,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "invalid url"),
            Self::Network => write!(f, "network error"),
            Self::Timeout => write!(f, "timeout"),
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::Body => write!(f, "body error"),
            Self::Panicked => write!(f, "fetch task panicked"),
        }
    }
}

/// A failed fetch, kept as data for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(url: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.url, self.kind, self.message)
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success(FetchedPage),
    Failure(FetchFailure),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A single remote-fetch operation
///
/// Implementations must resolve every error to `FetchOutcome::Failure` and
/// must not share transient state between distinct sessions.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, target: FetchTarget) -> FetchOutcome;
}

/// Read-only settings shared by every fetch session
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
}

impl FetchSettings {
    pub fn from_config(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Self {
        Self {
            user_agent: user_agent.header_value(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(crawler.fetch_timeout_secs),
            redirect_limit: crawler.redirect_limit,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("OrderHarvest/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 10,
        }
    }
}

/// Builds an HTTP client for one fetch session
///
/// Each client owns its connection pool and cookie jar, so two sessions
/// never see each other's cookies or reuse each other's connections.
pub fn build_http_client(settings: &FetchSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.request_timeout)
        .connect_timeout(settings.connect_timeout)
        .redirect(Policy::limited(settings.redirect_limit))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP with one fresh client per session
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: FetchTarget) -> FetchOutcome {
        tracing::debug!("[{}] Fetching {}", target.session, target.url);
        fetch_url(&self.settings, &target.url).await
    }
}

/// Fetches a URL with a freshly built client
///
/// # Error Classification
///
/// | Condition | FailureKind |
/// |-----------|-------------|
/// | Unparseable or non-HTTP(S) URL | InvalidUrl |
/// | Request timeout | Timeout |
/// | Connection refused, DNS, TLS, redirect limit | Network |
/// | Non-2xx status | HttpStatus(code) |
/// | Body read failure | Body |
pub async fn fetch_url(settings: &FetchSettings, url: &str) -> FetchOutcome {
    let parsed = match Url::parse(url) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => u,
        Ok(u) => {
            return FetchOutcome::Failure(FetchFailure::new(
                url,
                FailureKind::InvalidUrl,
                format!("unsupported scheme '{}'", u.scheme()),
            ))
        }
        Err(e) => {
            return FetchOutcome::Failure(FetchFailure::new(
                url,
                FailureKind::InvalidUrl,
                e.to_string(),
            ))
        }
    };

    let client = match build_http_client(settings) {
        Ok(client) => client,
        Err(e) => {
            return FetchOutcome::Failure(FetchFailure::new(
                url,
                FailureKind::Network,
                format!("failed to build client: {}", e),
            ))
        }
    };

    let response = match client.get(parsed).send().await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failure(classify_error(url, &e)),
    };

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return FetchOutcome::Failure(FetchFailure::new(
            url,
            FailureKind::HttpStatus(status.as_u16()),
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        ));
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            let mut failure = classify_error(url, &e);
            if failure.kind != FailureKind::Timeout {
                failure.kind = FailureKind::Body;
            }
            return FetchOutcome::Failure(failure);
        }
    };

    let parsed_page = parse_html(&body, &final_url);

    FetchOutcome::Success(FetchedPage {
        url: url.to_string(),
        final_url: final_url.to_string(),
        status_code: status.as_u16(),
        title: parsed_page.title,
        html: body,
        content: parsed_page.markdown,
        links: parsed_page.links,
    })
}

fn classify_error(url: &str, error: &reqwest::Error) -> FetchFailure {
    let kind = if error.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Network
    };
    FetchFailure::new(url, kind, error.to_string())
}
