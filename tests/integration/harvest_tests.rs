use crate::common::{create_test_config, document_page};
use order_harvest::crawler::Harvester;
use order_harvest::output::write_harvest_report;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_saves_documents() {
    let mock_server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_page(
        &mock_server,
        "/actions/page/1",
        200,
        r#"<html><body>
        <a href="/actions/2025/01/first-order/">First Order</a>
        <a href="/actions/2025/01/second-order/">Second Order</a>
        <a href="/actions/2025/01/missing/">Missing</a>
        <a href="/about/">About</a>
        <a href="https://elsewhere.example.org/actions/2025/x">External</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/actions/page/2",
        503,
        String::new(),
    )
    .await;
    mount_page(
        &mock_server,
        "/actions/2025/01/first-order/",
        200,
        document_page("The first order text"),
    )
    .await;
    mount_page(
        &mock_server,
        "/actions/2025/01/second-order/",
        200,
        document_page("The second order text"),
    )
    .await;
    mount_page(
        &mock_server,
        "/actions/2025/01/missing/",
        200,
        "<html><body>Page Missing</body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), work_dir.path(), 2);
    let articles_dir = config.output.articles_dir.clone();
    let summary = Harvester::new(config).run().await.unwrap();

    assert_eq!(summary.listing_pages_fetched, 1);
    assert_eq!(summary.listing_pages_failed, 1);
    assert_eq!(summary.links_found, 3);
    assert_eq!(summary.documents_fetched, 3);
    assert_eq!(summary.documents_failed, 0);
    assert_eq!(summary.documents_skipped, 1);
    assert_eq!(summary.documents_saved, 2);
    assert!(!summary.is_complete());
    assert!(summary.peak_memory_bytes > 0);

    let slugs: Vec<_> = summary.documents.iter().map(|d| d.slug.as_str()).collect();
    assert_eq!(slugs, vec!["01_first_order", "01_second_order"]);
    assert_eq!(summary.documents[0].link_text, "First Order");

    let first = std::fs::read_to_string(Path::new(&articles_dir).join("01_first_order.md"))
        .unwrap();
    assert!(first.contains("The first order text"));
    assert!(!first.contains("OrderStart"));
    assert!(!first.contains("Footer"));
    assert!(!Path::new(&articles_dir).join("01_missing.md").exists());

    let report_path = work_dir.path().join("summary.md");
    write_harvest_report(&summary, &report_path).await.unwrap();
    let report = std::fs::read_to_string(report_path).unwrap();
    assert!(report.contains("| Documents saved | 2 |"));
    assert!(report.contains("/actions/page/2"));
}

#[tokio::test]
async fn test_failed_document_does_not_stop_wave() {
    let mock_server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_page(
        &mock_server,
        "/actions/page/1",
        200,
        r#"<a href="/actions/2025/02/broken/">Broken</a>
           <a href="/actions/2025/02/fine/">Fine</a>"#
            .to_string(),
    )
    .await;
    mount_page(&mock_server, "/actions/2025/02/broken/", 500, String::new()).await;
    mount_page(
        &mock_server,
        "/actions/2025/02/fine/",
        200,
        document_page("Fine text"),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), work_dir.path(), 1);
    let summary = Harvester::new(config).run().await.unwrap();

    assert_eq!(summary.documents_failed, 1);
    assert_eq!(summary.documents_saved, 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].url.ends_with("/actions/2025/02/broken/"));
}

#[tokio::test]
async fn test_listing_without_matching_links() {
    let mock_server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_page(
        &mock_server,
        "/actions/page/1",
        200,
        r#"<a href="/news/">News</a>"#.to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), work_dir.path(), 1);
    let summary = Harvester::new(config).run().await.unwrap();

    assert_eq!(summary.listing_pages_fetched, 1);
    assert_eq!(summary.links_found, 0);
    assert_eq!(summary.documents_saved, 0);
    assert!(summary.is_complete());
}

#[tokio::test]
async fn test_duplicate_listing_links_yield_one_document() {
    let mock_server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_page(
        &mock_server,
        "/actions/page/1",
        200,
        r#"<a href="/actions/2025/01/a/">Order A</a>
           <a href="/actions/2025/01/a/">Read more</a>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/actions/2025/01/a/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(document_page("A text")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), work_dir.path(), 1);
    let articles_dir = config.output.articles_dir.clone();
    let summary = Harvester::new(config).run().await.unwrap();

    assert_eq!(summary.links_found, 2);
    assert_eq!(summary.documents_fetched, 1);
    assert_eq!(summary.documents_saved, 1);
    assert_eq!(summary.documents.len(), 1);
    assert_eq!(summary.documents[0].link_text, "Order A");

    let files = std::fs::read_dir(&articles_dir).unwrap().count();
    assert_eq!(files, 1);
}
