use serde::Deserialize;

/// Main configuration structure for Order-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub summarizer: Option<SummarizerConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of fetches dispatched in one wave
    #[serde(rename = "max-concurrent-pages-open")]
    pub max_concurrent_pages_open: u32,

    /// Upper bound on a single fetch, in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of redirects followed per fetch
    #[serde(rename = "redirect-limit", default = "default_redirect_limit")]
    pub redirect_limit: usize,
}

fn default_fetch_timeout() -> u64 {
    60
}

fn default_redirect_limit() -> usize {
    10
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Where listing pages live and how document pages are sliced
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Listing page URL template; `{page}` is replaced by the page number
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    #[serde(rename = "first-page", default = "default_first_page")]
    pub first_page: u32,

    #[serde(rename = "last-page")]
    pub last_page: u32,

    /// Only internal links starting with this prefix are harvested
    #[serde(rename = "link-prefix")]
    pub link_prefix: String,

    /// Sentinel that opens the content region of a document page
    #[serde(rename = "start-marker")]
    pub start_marker: String,

    /// Sentinel that closes the content region of a document page
    #[serde(rename = "end-marker")]
    pub end_marker: String,

    /// Document pages whose content starts with this are error pages
    #[serde(rename = "error-page-prefix", default)]
    pub error_page_prefix: Option<String>,
}

fn default_first_page() -> u32 {
    1
}

impl SourceConfig {
    /// Builds the listing URL for one page number
    pub fn listing_url_for(&self, page: u32) -> String {
        self.listing_url.replace("{page}", &page.to_string())
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one `<slug>.md` file per harvested document
    #[serde(rename = "articles-dir")]
    pub articles_dir: String,

    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown harvest report
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

/// Structured-extraction service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub endpoint: String,

    /// Name of the environment variable holding the bearer token
    #[serde(rename = "api-key-env", default)]
    pub api_key_env: Option<String>,

    #[serde(rename = "timeout-secs", default = "default_summarizer_timeout")]
    pub timeout_secs: u64,
}

fn default_summarizer_timeout() -> u64 {
    120
}
