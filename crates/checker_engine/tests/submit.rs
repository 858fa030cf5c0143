use std::path::PathBuf;
use std::time::Duration;

use checker_core::{SelectedImage, GENERIC_SERVER_ERROR};
use checker_engine::{FailureKind, ReqwestSubmitter, SubmitSettings, Submitter};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAKE_IMAGE: &[u8] = b"fake png bytes";

fn image_file(dir: &TempDir, name: &str) -> SelectedImage {
    let path = dir.path().join(name);
    std::fs::write(&path, FAKE_IMAGE).unwrap();
    SelectedImage::from_path(path)
}

fn submitter_for(server: &MockServer) -> ReqwestSubmitter {
    ReqwestSubmitter::new(SubmitSettings {
        endpoint: server.uri(),
        ..SubmitSettings::default()
    })
    .unwrap()
}

#[tokio::test]
async fn submit_posts_multipart_file_and_parses_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check-image"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains(r#"name="file""#))
        .and(body_string_contains(r#"filename="cat.png""#))
        .and(body_string_contains("Content-Type: image/png"))
        .and(body_string_contains("fake png bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"status":"Safe","reason":"no concerns","confidence":0.95,"categories":[],"category_scores":{}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let image = image_file(&dir, "cat.png");
    let result = submitter_for(&server).submit(&image).await.expect("verdict");

    assert_eq!(result.status, "Safe");
    assert_eq!(result.reason, "no concerns");
    assert_eq!(result.confidence_label(), "95.0%");
}

#[tokio::test]
async fn endpoint_with_trailing_slash_is_joined_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check-image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"status":"Not Safe","reason":"Sexual content detected","confidence":0.92,
                "categories":{"sexual":true,"violence":false},"category_scores":{"sexual":0.92}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let submitter = ReqwestSubmitter::new(SubmitSettings {
        endpoint: format!("{}/", server.uri()),
        ..SubmitSettings::default()
    })
    .unwrap();
    let result = submitter
        .submit(&image_file(&dir, "x.jpg"))
        .await
        .expect("verdict");

    assert_eq!(result.status, "Not Safe");
    assert_eq!(result.categories.len(), 1);
}

#[tokio::test]
async fn server_detail_becomes_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check-image"))
        .respond_with(
            ResponseTemplate::new(413)
                .set_body_raw(r#"{"detail": "file too large"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = submitter_for(&server)
        .submit(&image_file(&dir, "huge.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(413));
    assert_eq!(err.message, "file too large");
}

#[tokio::test]
async fn unparsable_error_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check-image"))
        .respond_with(
            ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = submitter_for(&server)
        .submit(&image_file(&dir, "cat.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(502));
    assert_eq!(err.message, GENERIC_SERVER_ERROR);
}

#[tokio::test]
async fn malformed_success_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check-image"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = submitter_for(&server)
        .submit(&image_file(&dir, "cat.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::MalformedResponse);
    assert!(err.message.starts_with("Invalid response from server"));
}

#[tokio::test]
async fn unreadable_file_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let missing = SelectedImage::from_path(PathBuf::from("/nonexistent/dir/cat.png"));
    let err = submitter_for(&server).submit(&missing).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Io);
    assert!(err.message.contains("cat.png"));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let submitter = ReqwestSubmitter::new(SubmitSettings {
        endpoint: format!("http://127.0.0.1:{port}"),
        ..SubmitSettings::default()
    })
    .unwrap();

    let dir = TempDir::new().unwrap();
    let err = submitter
        .submit(&image_file(&dir, "cat.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Network);
    assert!(!err.message.is_empty());
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check-image"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("{}"),
        )
        .mount(&server)
        .await;

    let submitter = ReqwestSubmitter::new(SubmitSettings {
        endpoint: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..SubmitSettings::default()
    })
    .unwrap();

    let dir = TempDir::new().unwrap();
    let err = submitter
        .submit(&image_file(&dir, "cat.png"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check-image"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let submitter = ReqwestSubmitter::new(SubmitSettings {
        endpoint: server.uri(),
        max_response_bytes: 16,
        ..SubmitSettings::default()
    })
    .unwrap();

    let dir = TempDir::new().unwrap();
    let err = submitter
        .submit(&image_file(&dir, "cat.png"))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(64)
        }
    );
}

#[tokio::test]
async fn invalid_endpoint_is_rejected() {
    let submitter = ReqwestSubmitter::new(SubmitSettings {
        endpoint: "not a url".to_string(),
        ..SubmitSettings::default()
    })
    .unwrap();

    let dir = TempDir::new().unwrap();
    let err = submitter
        .submit(&image_file(&dir, "cat.png"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn health_reports_status_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"status":"healthy"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let status = submitter_for(&server).health().await.expect("healthy");
    assert_eq!(status, "healthy");
}

#[tokio::test]
async fn health_failure_reports_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = submitter_for(&server).health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}
