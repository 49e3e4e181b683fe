use order_harvest::crawler::HarvestedDocument;
use order_harvest::ingest::{load_articles, Ingestor};
use order_harvest::storage::{DocumentStore, SqliteStore};
use order_harvest::summary::{HttpSummarizer, Summarizer, SummaryError};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn summary_body(link: &str) -> serde_json::Value {
    json!({
        "report": "# Analysis\n\nTLDR\n\n## Key Points\n- **Scope:** wide\n\n## Potential Implications\n- **Cost:** high\n\n## Final Summary\nSignificant.\n",
        "docLink": link,
        "metadata_title": "Securing the Border",
        "metadata_description": "Directs agencies to act",
        "signer": "The Signer",
        "dateSigned": "January 20, 2025",
        "executiveOrderNumber": 14165
    })
}

fn harvested(content: &str) -> HarvestedDocument {
    HarvestedDocument {
        source_url: "https://example.com/actions/2025/01/border/".to_string(),
        slug: "01_border".to_string(),
        link_text: "Securing the Border".to_string(),
        content: content.to_string(),
        path: PathBuf::from("01_border.md"),
    }
}

#[tokio::test]
async fn test_http_summarizer_sends_wrapped_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(header("authorization", "Bearer secret"))
        .and(body_string_contains("<ExecutiveOrder>"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body("https://x")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let summarizer = HttpSummarizer::new(
        format!("{}/extract", mock_server.uri()),
        Some("secret".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();

    let summary = summarizer.summarize("Sec. 1. Purpose.").await.unwrap();
    assert_eq!(summary.title, "Securing the Border");
    assert_eq!(summary.order_number(), Some(14165));
}

#[tokio::test]
async fn test_http_summarizer_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let summarizer =
        HttpSummarizer::new(mock_server.uri(), None, Duration::from_secs(5)).unwrap();

    match summarizer.summarize("text").await {
        Err(SummaryError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ingest_through_http_summarizer() {
    let mock_server = MockServer::start().await;
    let link = "https://example.com/actions/2025/01/border/";

    Mock::given(method("POST"))
        .and(body_string_contains("good document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(link)))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("garbled document"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"report\": 12"))
        .mount(&mock_server)
        .await;

    let summarizer =
        HttpSummarizer::new(mock_server.uri(), None, Duration::from_secs(5)).unwrap();
    let ingestor = Ingestor::new(Arc::new(summarizer));
    let mut store = SqliteStore::open_in_memory().unwrap();

    let report = ingestor
        .ingest(
            &mut store,
            &[harvested("good document"), harvested("garbled document")],
        )
        .await;

    assert_eq!(report.summarized, 1);
    assert_eq!(report.summary_failures, 1);
    assert_eq!(report.documents_created, 1);
    assert_eq!(report.artifacts_created, 3);

    let doc = store.get_document_by_url(link).unwrap().unwrap();
    assert_eq!(doc.signer, "The Signer");
    assert_eq!(doc.short_summary, "Directs agencies to act");
    assert_eq!(doc.order_number, Some(14165));

    let titles: Vec<_> = store
        .get_artifacts(doc.id)
        .unwrap()
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(
        titles,
        vec!["Key Points", "Potential Implications", "Final Summary"]
    );
    assert_eq!(store.count_documents().unwrap(), 1);
}

#[tokio::test]
async fn test_ingest_saved_articles_without_harvest() {
    let mock_server = MockServer::start().await;
    let articles_dir = tempfile::tempdir().unwrap();
    let link = "https://example.com/actions/2025/01/border/";

    std::fs::write(
        articles_dir.path().join("01_border.md"),
        "Sec. 1. saved border text",
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(body_string_contains("saved border text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(link)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let documents = load_articles(articles_dir.path()).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].slug, "01_border");

    let summarizer =
        HttpSummarizer::new(mock_server.uri(), None, Duration::from_secs(5)).unwrap();
    let ingestor = Ingestor::new(Arc::new(summarizer));
    let mut store = SqliteStore::open_in_memory().unwrap();

    let report = ingestor.ingest(&mut store, &documents).await;

    assert_eq!(report.documents_created, 1);
    assert!(!report.has_failures());
    let doc = store.get_document_by_url(link).unwrap().unwrap();
    assert_eq!(doc.title, "Securing the Border");
}
