use order_harvest::crawler::{
    fetch_url, BatchScheduler, FailureKind, FetchOutcome, FetchSettings, HttpFetcher,
};
use order_harvest::monitor::ResourceMonitor;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_partitions_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Listing</title></head><body>
            <a href="/actions/2025/01/one/">  Order   One </a>
            <a href="https://other.example.org/page">Elsewhere</a>
            <a href="mailto:someone@example.com">Mail</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/listing", mock_server.uri());
    let outcome = fetch_url(&FetchSettings::default(), &url).await;

    let FetchOutcome::Success(page) = outcome else {
        panic!("Expected success, got {:?}", outcome);
    };
    assert_eq!(page.status_code, 200);
    assert_eq!(page.title.as_deref(), Some("Listing"));
    assert_eq!(page.links.internal.len(), 1);
    assert_eq!(
        page.links.internal[0].href,
        format!("{}/actions/2025/01/one/", mock_server.uri())
    );
    assert_eq!(page.links.internal[0].text, "Order One");
    assert_eq!(page.links.external.len(), 1);
}

#[tokio::test]
async fn test_fetch_server_error_is_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = format!("{}/broken", mock_server.uri());
    match fetch_url(&FetchSettings::default(), &url).await {
        FetchOutcome::Failure(failure) => {
            assert_eq!(failure.kind, FailureKind::HttpStatus(500));
            assert_eq!(failure.url, url);
        }
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_unreachable_host_is_failure() {
    let settings = FetchSettings {
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(2),
        ..FetchSettings::default()
    };
    // Port 9 (discard) is closed on test machines
    let outcome = fetch_url(&settings, "http://127.0.0.1:9/").await;
    assert!(matches!(
        outcome,
        FetchOutcome::Failure(ref f) if f.kind == FailureKind::Network || f.kind == FailureKind::Timeout
    ));
}

#[tokio::test]
async fn test_sessions_do_not_share_cookies() {
    let mock_server = MockServer::start().await;

    // A request carrying a cookie gets a conflict instead of the page
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc; Path=/")
                .set_body_string("<html><body>ok</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/page", mock_server.uri());
    let settings = FetchSettings::default();
    assert!(fetch_url(&settings, &url).await.is_success());
    assert!(fetch_url(&settings, &url).await.is_success());
}

#[tokio::test]
async fn test_scheduler_wave_with_one_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>good</p>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let scheduler = BatchScheduler::new(
        Arc::new(HttpFetcher::default()),
        Arc::new(ResourceMonitor::new()),
        Duration::from_secs(10),
    );
    let urls = vec![
        format!("{}/bad", mock_server.uri()),
        format!("{}/good", mock_server.uri()),
    ];

    let report = scheduler.run(&urls, 2).await;

    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 1);
    assert_eq!(report.waves.len(), 1);
    assert_eq!(report.pages[0].url, urls[1]);
    assert_eq!(report.failures[0].kind, FailureKind::HttpStatus(404));
    assert!(report.final_memory.peak_bytes >= report.final_memory.current_bytes);
}
