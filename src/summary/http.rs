use crate::config::SummarizerConfig;
use crate::summary::{DocumentSummary, Summarizer, SummaryError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

/// Wraps document text so the service treats it as data, not instructions
pub fn build_prompt(document_text: &str) -> String {
    format!("<ExecutiveOrder>\n{}\n</ExecutiveOrder>", document_text)
}

/// Calls a JSON structured-extraction endpoint
///
/// The request body is `{"prompt": "..."}`; the response body must be the
/// `DocumentSummary` record itself.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSummarizer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SummaryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Builds the summarizer, reading the API key from the configured variable
    pub fn from_config(config: &SummarizerConfig) -> Result<Self, SummaryError> {
        let api_key = match &config.api_key_env {
            Some(var) => Some(
                std::env::var(var).map_err(|_| SummaryError::MissingApiKey(var.clone()))?,
            ),
            None => None,
        };

        Self::new(
            config.endpoint.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, document_text: &str) -> Result<DocumentSummary, SummaryError> {
        let body = json!({ "prompt": build_prompt(document_text) });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SummaryError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::debug!("Summarizer returned {} bytes", text.len());
        DocumentSummary::from_json(&text)
    }
}
