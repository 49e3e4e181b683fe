use order_harvest::config::{
    Config, CrawlerConfig, OutputConfig, SourceConfig, UserAgentConfig,
};
use std::path::Path;

pub const START_MARKER: &str = "OrderStart";
pub const END_MARKER: &str = "OrderEnd";

/// Creates a harvest configuration pointing at a mock server
pub fn create_test_config(base_url: &str, work_dir: &Path, last_page: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_pages_open: 2,
            fetch_timeout_secs: 5,
            redirect_limit: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        source: SourceConfig {
            listing_url: format!("{}/actions/page/{{page}}", base_url),
            first_page: 1,
            last_page,
            link_prefix: format!("{}/actions/2025", base_url),
            start_marker: START_MARKER.to_string(),
            end_marker: END_MARKER.to_string(),
            error_page_prefix: Some("Page Missing".to_string()),
        },
        output: OutputConfig {
            articles_dir: work_dir.join("articles").display().to_string(),
            database_path: work_dir.join("orders.db").display().to_string(),
            summary_path: work_dir.join("summary.md").display().to_string(),
        },
        summarizer: None,
    }
}

/// A document page whose content region is `body`
pub fn document_page(body: &str) -> String {
    format!(
        "<html><head><title>Order</title></head><body>\
         <nav><p>Menu</p></nav>\
         <p>{}</p><p>{}</p><p>{}</p>\
         <footer><p>Footer</p></footer></body></html>",
        START_MARKER, body, END_MARKER
    )
}
