use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uplink_client::{
    poll_until_terminal, ApiClient, ApiError, ClientSettings, PollOutcome, PollSettings,
    StatusReport, StatusSink, TaskId, TaskStatus,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct TestSink {
    reports: Arc<Mutex<Vec<StatusReport>>>,
}

impl TestSink {
    fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Vec<StatusReport> {
        self.reports.lock().unwrap().drain(..).collect()
    }

    fn len(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

impl StatusSink for TestSink {
    fn report(&self, report: StatusReport) {
        self.reports.lock().unwrap().push(report);
    }
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

fn fast_poll() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(20),
    }
}

#[tokio::test]
async fn polling_stops_on_the_first_terminal_status() {
    let server = MockServer::start().await;
    // First tick sees PROCESSING, second tick sees SUCCESS, then nothing
    // more may arrive (expectations are verified on server drop).
    Mock::given(method("GET"))
        .and(path("/api/task_status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "PROCESSING"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task_status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "SUCCESS",
            "result": "{\"a\":1}"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sink = TestSink::new();
    let cancel = CancellationToken::new();

    let outcome = poll_until_terminal(&client, &TaskId::new("abc"), &fast_poll(), &sink, &cancel)
        .await
        .expect("poll ok");

    assert_eq!(
        outcome,
        PollOutcome::Succeeded {
            result: Some("{\"a\":1}".to_string()),
        }
    );
    let reports = sink.take();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].status, TaskStatus::Processing);
    assert_eq!(reports[1].status, TaskStatus::Success);

    // Give a stray tick time to show up before the expectations are checked.
    tokio::time::sleep(Duration::from_millis(80)).await;
}

#[tokio::test]
async fn backend_failure_is_a_terminal_outcome_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task_status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "FAILURE",
            "error_message": "OCR failed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sink = TestSink::new();
    let cancel = CancellationToken::new();

    let outcome = poll_until_terminal(&client, &TaskId::new("abc"), &fast_poll(), &sink, &cancel)
        .await
        .expect("poll ok");

    assert_eq!(
        outcome,
        PollOutcome::Failed {
            error_message: Some("OCR failed".to_string()),
        }
    );
    tokio::time::sleep(Duration::from_millis(80)).await;
}

#[tokio::test]
async fn transport_errors_fail_fast_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task_status/abc"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sink = TestSink::new();
    let cancel = CancellationToken::new();

    let err = poll_until_terminal(&client, &TaskId::new("abc"), &fast_poll(), &sink, &cancel)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Http {
            status: 500,
            message: "500 Internal Server Error".to_string(),
        }
    );
    assert_eq!(sink.len(), 0);
    tokio::time::sleep(Duration::from_millis(80)).await;
}

#[tokio::test]
async fn malformed_bodies_abort_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task_status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sink = TestSink::new();
    let cancel = CancellationToken::new();

    let err = poll_until_terminal(&client, &TaskId::new("abc"), &fast_poll(), &sink, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::MalformedResponse(_)));
}

#[tokio::test]
async fn cancellation_before_the_first_tick_issues_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task_status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "PROCESSING"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sink = TestSink::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = poll_until_terminal(&client, &TaskId::new("abc"), &fast_poll(), &sink, &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Cancelled);
    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn cancellation_mid_session_stops_further_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task_status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "PROCESSING",
            "status_message": "still working"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sink = TestSink::new();
    let cancel = CancellationToken::new();

    let poller = {
        let client = client.clone();
        let sink = sink.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            poll_until_terminal(&client, &TaskId::new("abc"), &fast_poll(), &sink, &cancel).await
        })
    };

    // Let a few ticks happen, then revoke the token.
    tokio::time::sleep(Duration::from_millis(70)).await;
    cancel.cancel();
    let result = poller.await.expect("join poller");
    assert_eq!(result, Err(ApiError::Cancelled));

    let ticks_at_cancel = sink.len();
    assert!(ticks_at_cancel >= 1);

    // The loop is inert now; no new reports may appear.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(sink.len(), ticks_at_cancel);
}
