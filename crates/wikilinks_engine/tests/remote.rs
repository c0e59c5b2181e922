use std::time::Duration;

use wikilinks_engine::{ProbeSettings, RemoteProber, ReqwestProber};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn probe_reports_status_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/docs/guide.md"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Type", "text/markdown"))
        .mount(&server)
        .await;

    let prober = ReqwestProber::default();
    let outcome = prober.probe(&format!("{}/docs/guide.md", server.uri())).await;

    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.mime_type.as_deref(), Some("text/markdown"));
    assert_eq!(outcome.real_file_name.as_deref(), Some("guide.md"));
    assert_eq!(outcome.error, None);
    assert!(outcome.exists());
}

#[tokio::test]
async fn probe_uses_content_disposition_filename() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"report.pdf\""),
        )
        .mount(&server)
        .await;

    let outcome = ReqwestProber::default()
        .probe(&format!("{}/download", server.uri()))
        .await;

    assert_eq!(outcome.real_file_name.as_deref(), Some("report.pdf"));
}

#[tokio::test]
async fn missing_page_does_not_exist() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let outcome = ReqwestProber::default()
        .probe(&format!("{}/missing", server.uri()))
        .await;

    assert_eq!(outcome.status_code, 404);
    assert_eq!(outcome.error, None);
    assert!(!outcome.exists());
}

#[tokio::test]
async fn slow_response_is_aborted() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let settings = ProbeSettings {
        request_timeout: Duration::from_millis(50),
        ..ProbeSettings::default()
    };
    let outcome = ReqwestProber::new(settings)
        .probe(&format!("{}/slow", server.uri()))
        .await;

    assert_eq!(outcome.status_code, 0);
    assert_eq!(outcome.error.as_deref(), Some("operation aborted"));
    assert!(!outcome.exists());
}

#[tokio::test]
async fn unparsable_url_is_captured_as_error() {
    let outcome = ReqwestProber::default().probe("http://[not-a-host").await;

    assert_eq!(outcome.status_code, 0);
    assert!(outcome.error.is_some());
    assert!(!outcome.exists());
}

#[tokio::test]
async fn connection_failure_is_captured_as_error() {
    let server = MockServer::start().await;
    let url = format!("{}/gone", server.uri());
    drop(server);

    let outcome = ReqwestProber::default().probe(&url).await;

    assert_eq!(outcome.status_code, 0);
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn one_prober_serves_many_links() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let prober = ReqwestProber::default();
    for page in ["a", "b", "c"] {
        let outcome = prober.probe(&format!("{}/{page}", server.uri())).await;
        assert_eq!(outcome.status_code, 200);
        assert_eq!(outcome.real_file_name.as_deref(), Some(page));
    }
}
