use std::sync::mpsc;
use std::time::Duration;

use blog2pdf_engine::{BackendSettings, EngineEvent, EngineHandle, Stage};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_URL: &str = "https://en.wikipedia.org/wiki/India";

fn spawn_engine(server: &MockServer) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (event_tx, event_rx) = mpsc::channel();
    let engine = EngineHandle::spawn(
        BackendSettings {
            base_url: server.uri(),
            ..BackendSettings::default()
        },
        event_tx,
    )
    .expect("engine");
    (engine, event_rx)
}

fn next_event(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    rx.recv_timeout(Duration::from_secs(5)).expect("engine event")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn check_events_carry_their_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessible": true })))
        .mount(&server)
        .await;

    let (engine, events) = spawn_engine(&server);
    engine.check(42, TEST_URL);

    match next_event(&events) {
        EngineEvent::AccessibilityChecked { submission, result } => {
            assert_eq!(submission, 42);
            assert!(result.accessible);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn convert_reports_progress_then_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&b"%PDF-1.4"[..], "application/pdf"))
        .mount(&server)
        .await;

    let (engine, events) = spawn_engine(&server);
    engine.convert(3, TEST_URL);

    let mut stages = Vec::new();
    loop {
        match next_event(&events) {
            EngineEvent::Progress { submission, stage } => {
                assert_eq!(submission, 3);
                stages.push(stage);
            }
            EngineEvent::ConversionCompleted { submission, result } => {
                assert_eq!(submission, 3);
                assert_eq!(result.expect("pdf").bytes.as_ref(), b"%PDF-1.4");
                break;
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        stages,
        vec![Stage::Fetching, Stage::Processing, Stage::Generating]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn probe_reports_offline_backend_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (engine, events) = spawn_engine(&server);
    engine.probe();

    match next_event(&events) {
        EngineEvent::BackendProbed(result) => assert!(result.is_err()),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn invalid_backend_url_fails_to_spawn() {
    let (event_tx, _event_rx) = mpsc::channel();
    let result = EngineHandle::spawn(
        BackendSettings {
            base_url: "localhost without scheme".to_string(),
            ..BackendSettings::default()
        },
        event_tx,
    );
    assert!(result.is_err());
}
