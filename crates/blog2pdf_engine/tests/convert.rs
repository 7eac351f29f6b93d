use std::sync::{Arc, Mutex};

use blog2pdf_engine::{
    BackendClient, BackendSettings, ClientError, ProgressSink, ReqwestBackend, Stage,
    CONVERT_REJECTED_MESSAGE, CONVERT_TRANSPORT_MESSAGE, DEFAULT_PDF_FILENAME,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_URL: &str = "https://en.wikipedia.org/wiki/India";
const PDF: &[u8] = b"%PDF-1.4 mock pdf content";

#[derive(Default)]
struct TestSink {
    stages: Arc<Mutex<Vec<Stage>>>,
}

impl TestSink {
    fn take(&self) -> Vec<Stage> {
        self.stages.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, stage: Stage) {
        self.stages.lock().unwrap().push(stage);
    }
}

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("backend")
}

#[tokio::test]
async fn convert_returns_pdf_with_download_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_json(json!({ "url": TEST_URL })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(PDF, "application/pdf")
                .insert_header("content-disposition", "attachment; filename=blog-article.pdf")
                .insert_header("x-download-token", "abc123")
                .insert_header("x-expires-in", "1 hour"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sink = TestSink::default();
    let output = backend_for(&server)
        .convert(TEST_URL, &sink)
        .await
        .expect("convert ok");

    assert_eq!(output.bytes.as_ref(), PDF);
    assert_eq!(output.filename, "blog-article.pdf");
    assert_eq!(output.source_url, TEST_URL);
    assert_eq!(output.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(output.download_token.as_deref(), Some("abc123"));
    assert_eq!(output.expires_in.as_deref(), Some("1 hour"));
    assert_eq!(
        sink.take(),
        vec![Stage::Fetching, Stage::Processing, Stage::Generating]
    );
}

#[tokio::test]
async fn missing_disposition_falls_back_to_default_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PDF, "application/pdf"))
        .mount(&server)
        .await;

    let output = backend_for(&server)
        .convert(TEST_URL, &TestSink::default())
        .await
        .unwrap();
    assert_eq!(output.filename, DEFAULT_PDF_FILENAME);
    assert_eq!(output.download_token, None);
}

#[tokio::test]
async fn rejection_detail_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "detail": "PDF generation failed: bad html" })),
        )
        .mount(&server)
        .await;

    let sink = TestSink::default();
    let err = backend_for(&server)
        .convert(TEST_URL, &sink)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::Rejected {
            status: 500,
            detail: Some("PDF generation failed: bad html".to_string()),
        }
    );
    assert_eq!(err.conversion_message(), "PDF generation failed: bad html");
    assert_eq!(sink.take(), vec![Stage::Fetching]);
}

#[tokio::test]
async fn rejection_without_detail_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .convert(TEST_URL, &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.conversion_message(), CONVERT_REJECTED_MESSAGE);
}

#[tokio::test]
async fn oversized_pdf_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![b'x'; 2048], "application/pdf"))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        max_pdf_bytes: 1024,
        ..BackendSettings::default()
    })
    .unwrap();

    let err = backend
        .convert(TEST_URL, &TestSink::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::TooLarge { max_bytes: 1024, .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: format!("http://127.0.0.1:{port}"),
        ..BackendSettings::default()
    })
    .unwrap();

    let err = backend
        .convert(TEST_URL, &TestSink::default())
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.conversion_message(), CONVERT_TRANSPORT_MESSAGE);
}
