use super::*;
use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::json;
use shared::protocol::ContactSubmission;
use tokio::{
    net::TcpListener,
    io::{AsyncReadExt, AsyncWriteExt},
    sync::{mpsc, Notify},
};

#[derive(Debug, Clone)]
struct CapturedRequest {
    fields: HashMap<String, String>,
    accept: Option<String>,
}

#[derive(Clone)]
struct RelayState {
    status: StatusCode,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn handle_relay(
    State(state): State<RelayState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.insert(name, value);
    }
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .captured
        .lock()
        .await
        .push(CapturedRequest { fields, accept });

    if state.status.is_success() {
        (state.status, Json(json!({ "ok": true, "next": "/thanks" })))
    } else {
        (
            state.status,
            Json(json!({ "errors": [{ "field": "email", "message": "should be an email" }] })),
        )
    }
}

async fn spawn_relay(
    status: StatusCode,
) -> anyhow::Result<(String, Arc<Mutex<Vec<CapturedRequest>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = RelayState {
        status,
        captured: captured.clone(),
    };
    let app = Router::new()
        .route("/f/test-form", post(handle_relay))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/f/test-form"), captured))
}

/// Relay that parks inside `deliver` until released, to observe the
/// in-flight window. Every entry into `deliver` is reported on `started`.
struct GatedRelay {
    started: Option<mpsc::UnboundedSender<()>>,
    release: Arc<Notify>,
    fail: bool,
}

impl GatedRelay {
    fn observed(fail: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<()>, Arc<Notify>) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let release = Arc::new(Notify::new());
        let relay = Arc::new(Self {
            started: Some(started_tx),
            release: release.clone(),
            fail,
        });
        (relay, started_rx, release)
    }
}

#[async_trait]
impl FormRelay for GatedRelay {
    async fn deliver(
        &self,
        _submission: &ContactSubmission,
    ) -> Result<RelayReceipt, SubmissionError> {
        if let Some(tx) = &self.started {
            let _ = tx.send(());
        }
        self.release.notified().await;
        if self.fail {
            Err(SubmissionError::Rejected {
                status: 500,
                detail: "relay down".into(),
            })
        } else {
            Ok(RelayReceipt::accepted())
        }
    }
}

async fn fill_valid(controller: &ContactFormController) {
    controller.update_field(FormField::Name, "Ada Lovelace").await;
    controller
        .update_field(FormField::Email, "ada@example.com")
        .await;
    controller
        .update_field(FormField::Message, "Let's build something.")
        .await;
}

#[tokio::test]
async fn blank_fields_keep_status_idle_and_skip_the_network() {
    let (endpoint, captured) = spawn_relay(StatusCode::OK).await.expect("spawn relay");
    let controller = ContactFormController::over_http(&endpoint).expect("controller");
    controller.update_field(FormField::Email, "ada@example.com").await;
    controller.update_field(FormField::Message, "   ").await;

    let outcome = controller.submit().await.expect("submit");

    assert_eq!(
        outcome,
        SubmitOutcome::Invalid(vec![FormField::Name, FormField::Message])
    );
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.status, SubmissionStatus::Idle);
    assert_eq!(snapshot.errors.name, "Name is required.");
    assert_eq!(snapshot.errors.email, "");
    assert_eq!(snapshot.errors.message, "Message is required.");
    assert!(captured.lock().await.is_empty());

    controller.update_field(FormField::Name, "Ada").await;
    assert_eq!(controller.field_error(FormField::Name).await, "");
    assert_eq!(
        controller.field_error(FormField::Message).await,
        "Message is required."
    );
    controller.update_field(FormField::Message, "hello").await;
    assert!(controller.validate().await);
}

#[tokio::test]
async fn successful_submit_posts_multipart_and_resets_form() {
    let (endpoint, captured) = spawn_relay(StatusCode::OK).await.expect("spawn relay");
    let controller = ContactFormController::over_http(&endpoint).expect("controller");
    fill_valid(&controller).await;

    let outcome = controller.submit().await.expect("submit");

    assert_eq!(
        outcome,
        SubmitOutcome::Sent(RelayReceipt {
            ok: true,
            next: Some("/thanks".into()),
        })
    );
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.status, SubmissionStatus::Succeeded);
    assert_eq!(snapshot.values, FormValues::default());
    assert!(snapshot.errors.is_clear());

    let requests = captured.lock().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.accept.as_deref(), Some("application/json"));
    assert_eq!(request.fields.get("name").map(String::as_str), Some("Ada Lovelace"));
    assert_eq!(
        request.fields.get("email").map(String::as_str),
        Some("ada@example.com")
    );
    assert_eq!(
        request.fields.get("message").map(String::as_str),
        Some("Let's build something.")
    );
}

#[tokio::test]
async fn rejected_submit_fails_and_keeps_field_values() {
    let (endpoint, captured) = spawn_relay(StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .expect("spawn relay");
    let controller = ContactFormController::over_http(&endpoint)
        .expect("controller")
        .with_diagnostics(true);
    fill_valid(&controller).await;

    let err = controller.submit().await.expect_err("must fail");

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    assert!(
        err.to_string().contains("email: should be an email"),
        "unexpected error: {err}"
    );
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.status, SubmissionStatus::Failed);
    assert_eq!(snapshot.values.name, "Ada Lovelace");
    assert_eq!(snapshot.values.email, "ada@example.com");
    assert!(snapshot.can_submit());
    assert_eq!(captured.lock().await.len(), 1);
}

#[tokio::test]
async fn unreachable_relay_is_a_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let controller =
        ContactFormController::over_http(&format!("http://{addr}/f/gone")).expect("controller");
    fill_valid(&controller).await;

    let err = controller.submit().await.expect_err("must fail");
    assert!(matches!(err, SubmissionError::Transport(_)), "{err:?}");
    assert_eq!(controller.status().await, SubmissionStatus::Failed);
    assert_eq!(
        controller.snapshot().await.values.message,
        "Let's build something."
    );
}

#[tokio::test]
async fn failed_submission_can_be_retried() {
    let release = Arc::new(Notify::new());
    let relay = Arc::new(GatedRelay {
        started: None,
        release: release.clone(),
        fail: true,
    });
    let controller = ContactFormController::new(relay);
    fill_valid(&controller).await;

    release.notify_one();
    controller.submit().await.expect_err("first attempt fails");
    assert_eq!(controller.status().await, SubmissionStatus::Failed);

    release.notify_one();
    controller.submit().await.expect_err("retry also fails");
    assert_eq!(controller.status().await, SubmissionStatus::Failed);
}

#[tokio::test]
async fn retry_after_failure_passes_through_submitting() {
    let (relay, mut started_rx, release) = GatedRelay::observed(true);
    let controller = ContactFormController::new(relay);
    fill_valid(&controller).await;

    for attempt in 0..2 {
        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        started_rx.recv().await.expect("relay entered");

        assert_eq!(
            controller.status().await,
            SubmissionStatus::Submitting,
            "attempt {attempt}"
        );
        assert!(!controller.can_submit().await);

        release.notify_one();
        pending
            .await
            .expect("join")
            .expect_err("relay rejects every attempt");
        assert_eq!(controller.status().await, SubmissionStatus::Failed);
        assert!(controller.can_submit().await);
    }
}

#[tokio::test]
async fn invalid_submit_after_failure_stays_failed() {
    let (relay, mut started_rx, release) = GatedRelay::observed(true);
    let controller = ContactFormController::new(relay);
    fill_valid(&controller).await;

    release.notify_one();
    controller.submit().await.expect_err("relay rejects");
    started_rx.recv().await.expect("relay entered");
    assert_eq!(controller.status().await, SubmissionStatus::Failed);

    controller.update_field(FormField::Name, "   ").await;
    let outcome = controller.submit().await.expect("submit");

    assert_eq!(outcome, SubmitOutcome::Invalid(vec![FormField::Name]));
    assert_eq!(controller.status().await, SubmissionStatus::Failed);
    assert_eq!(controller.field_error(FormField::Name).await, "Name is required.");
    assert!(started_rx.try_recv().is_err(), "no second delivery");
}

/// Answers one request with a 2xx whose body is cut short.
async fn spawn_truncated_relay() -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request.ends_with(b"--\r\n") {
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&chunk[..n]),
            }
        }
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"ok\":")
            .await;
        let _ = socket.shutdown().await;
        // Drain until the client hangs up so the close is not a reset.
        while let Ok(n) = socket.read(&mut chunk).await {
            if n == 0 {
                break;
            }
        }
    });
    Ok(format!("http://{addr}/f/truncated"))
}

#[tokio::test]
async fn accepted_submission_with_truncated_body_still_succeeds() {
    let endpoint = spawn_truncated_relay().await.expect("spawn relay");
    let controller = ContactFormController::over_http(&endpoint).expect("controller");
    fill_valid(&controller).await;

    let outcome = controller.submit().await.expect("2xx is success");

    assert_eq!(outcome, SubmitOutcome::Sent(RelayReceipt::accepted()));
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.status, SubmissionStatus::Succeeded);
    assert_eq!(snapshot.values, FormValues::default());
}

#[tokio::test]
async fn in_flight_submission_ignores_repeat_submit_but_accepts_edits() {
    let (relay, mut started_rx, release) = GatedRelay::observed(false);
    let controller = ContactFormController::new(relay);
    fill_valid(&controller).await;

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit().await })
    };
    started_rx.recv().await.expect("relay entered");

    assert_eq!(controller.status().await, SubmissionStatus::Submitting);
    assert!(!controller.can_submit().await);
    assert_eq!(
        controller.submit().await.expect("repeat submit"),
        SubmitOutcome::InFlight
    );
    controller.update_field(FormField::Name, "Grace Hopper").await;
    assert_eq!(controller.snapshot().await.values.name, "Grace Hopper");

    release.notify_one();
    let outcome = pending.await.expect("join").expect("submit");
    assert_eq!(outcome, SubmitOutcome::Sent(RelayReceipt::accepted()));
    assert_eq!(controller.status().await, SubmissionStatus::Succeeded);
    assert_eq!(controller.snapshot().await.values, FormValues::default());
}

#[tokio::test]
async fn acknowledge_returns_terminal_states_to_idle() {
    let release = Arc::new(Notify::new());
    let controller = ContactFormController::new(Arc::new(GatedRelay {
        started: None,
        release: release.clone(),
        fail: false,
    }));

    controller.acknowledge().await;
    assert_eq!(controller.status().await, SubmissionStatus::Idle);

    fill_valid(&controller).await;
    release.notify_one();
    controller.submit().await.expect("submit");
    assert_eq!(controller.status().await, SubmissionStatus::Succeeded);

    controller.acknowledge().await;
    assert_eq!(controller.status().await, SubmissionStatus::Idle);
}

#[test]
fn endpoint_must_be_http_url() {
    assert!(relay::parse_endpoint("https://formspree.io/f/abc").is_ok());
    assert!(matches!(
        relay::parse_endpoint("ftp://example.com/form"),
        Err(SubmissionError::InvalidEndpoint { .. })
    ));
    assert!(matches!(
        relay::parse_endpoint("not a url"),
        Err(SubmissionError::InvalidEndpoint { .. })
    ));
}
