//! Scan dispatch and login integration tests against a mock transport.
//! These exercise the facade end to end: token sourcing, single dispatch,
//! route/body construction, and degradation of transport failures.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use auragate::scan::{
    Checkpoint, EventEndpoint, GateAction, Operation, RawResponse, ScanOutcome, ScanTransport,
    TransportError,
};
use auragate::session::{MemoryBackend, Scope, Session, SessionStore};
use auragate::OperatorClient;

/// Records every call and replays canned replies in order.
struct MockTransport {
    calls: Mutex<Vec<(String, Value, Option<String>)>>,
    replies: Mutex<Vec<Result<RawResponse, TransportError>>>,
    hang: bool,
}

impl MockTransport {
    fn replying(replies: Vec<Result<RawResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), replies: Mutex::new(replies), hang: false })
    }

    fn hanging() -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), replies: Mutex::new(Vec::new()), hang: true })
    }

    fn ok(status: u16, body: &str) -> Result<RawResponse, TransportError> {
        Ok(RawResponse { status, body: body.to_string() })
    }

    fn calls(&self) -> Vec<(String, Value, Option<String>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ScanTransport for MockTransport {
    async fn post_json(
        &self,
        route: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        self.calls
            .lock()
            .push((route.to_string(), body.clone(), bearer.map(str::to_string)));
        if self.hang {
            futures::future::pending::<()>().await;
        }
        let mut replies = self.replies.lock();
        if replies.is_empty() {
            return Err(TransportError::Connect("no canned reply".into()));
        }
        replies.remove(0)
    }
}

fn store_with_token(token: &str) -> Arc<SessionStore> {
    let store = SessionStore::with_backend(Box::<MemoryBackend>::default());
    store.save(&Session {
        token: token.into(),
        username: "gate7".into(),
        role: "scanner".into(),
        scope: Scope::Gates { assigned_gates: vec!["main-gate".into()] },
    });
    Arc::new(store)
}

fn gate_entry() -> Operation {
    Operation::Gate { checkpoint: Checkpoint::MainGate, action: GateAction::Entry }
}

#[tokio::test]
async fn scan_sends_bearer_from_store_and_dispatches_once() {
    let transport = MockTransport::replying(vec![MockTransport::ok(
        200,
        r#"{"success":true,"message":"Recorded"}"#,
    )]);
    let client = OperatorClient::with_parts(transport.clone(), store_with_token("tok-abc"));

    let outcome = client.submit_scan("GIT2023-0042", &gate_entry()).await;
    assert_eq!(
        outcome,
        ScanOutcome::Acknowledged { message: "Recorded".into(), user_type: None }
    );

    let calls = transport.calls();
    assert_eq!(calls.len(), 1, "exactly one request per scan, never a retry");
    let (route, body, bearer) = &calls[0];
    assert_eq!(route, "entry/main-gate");
    assert_eq!(body, &json!({ "identifier": "GIT2023-0042" }));
    assert_eq!(bearer.as_deref(), Some("tok-abc"));
}

#[tokio::test]
async fn json_payload_token_becomes_the_identifier() {
    let transport = MockTransport::replying(vec![MockTransport::ok(
        200,
        r#"{"success":true,"message":"ok"}"#,
    )]);
    let client = OperatorClient::with_parts(transport.clone(), store_with_token("tok"));

    client.submit_scan(r#"{"token":"X","v":1}"#, &gate_entry()).await;
    assert_eq!(transport.calls()[0].1, json!({ "identifier": "X" }));
}

#[tokio::test]
async fn event_operation_routes_and_carries_coordinates() {
    let transport = MockTransport::replying(vec![MockTransport::ok(
        200,
        r#"{"success":true,"message":"Marked"}"#,
    )]);
    let client = OperatorClient::with_parts(transport.clone(), store_with_token("tok"));

    let op = Operation::Event {
        registration_id: "r-17".into(),
        user_id: "u-3".into(),
        event_id: "e-9".into(),
        endpoint: EventEndpoint::Mark,
    };
    client.submit_scan("badge-1", &op).await;

    let (route, body, _) = &transport.calls()[0];
    assert_eq!(route, "attendance/mark");
    assert_eq!(
        body,
        &json!({
            "identifier": "badge-1",
            "registrationId": "r-17",
            "userId": "u-3",
            "eventId": "e-9",
        })
    );
}

#[tokio::test]
async fn transport_timeout_degrades_to_transport_failure() {
    let transport = MockTransport::replying(vec![Err(TransportError::Timeout)]);
    let client = OperatorClient::with_parts(transport, store_with_token("tok"));

    let outcome = client.submit_scan("badge-1", &gate_entry()).await;
    assert!(matches!(outcome, ScanOutcome::TransportFailure { .. }));
}

#[tokio::test]
async fn rejection_carries_server_message_and_status() {
    let transport =
        MockTransport::replying(vec![MockTransport::ok(409, r#"{"message":"Already marked"}"#)]);
    let client = OperatorClient::with_parts(transport, store_with_token("tok"));

    let outcome = client.submit_scan("badge-1", &gate_entry()).await;
    assert_eq!(
        outcome,
        ScanOutcome::Rejected { message: "Already marked".into(), status: Some(409) }
    );
}

#[tokio::test]
async fn scan_without_session_sends_no_bearer() {
    let transport = MockTransport::replying(vec![MockTransport::ok(
        401,
        r#"{"message":"Unauthorized"}"#,
    )]);
    let store = Arc::new(SessionStore::with_backend(Box::<MemoryBackend>::default()));
    let client = OperatorClient::with_parts(transport.clone(), store);

    client.submit_scan("badge-1", &gate_entry()).await;
    assert_eq!(transport.calls()[0].2, None);
}

#[tokio::test]
async fn caller_can_cancel_an_in_flight_scan() {
    let transport = MockTransport::hanging();
    let store = store_with_token("tok");
    let client = OperatorClient::with_parts(transport, store.clone());

    let result =
        tokio::time::timeout(Duration::from_millis(20), client.submit_scan("badge-1", &gate_entry()))
            .await;
    assert!(result.is_err(), "scan future should still be pending when the caller gives up");
    // Dropping the future must not disturb the stored session.
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn login_persists_session_before_returning() {
    let transport = MockTransport::replying(vec![MockTransport::ok(
        200,
        r#"{"success":true,"token":"tok-new","data":{"username":"gate7","role":"scanner","assignedGates":["main-gate"]}}"#,
    )]);
    let store = Arc::new(SessionStore::with_backend(Box::<MemoryBackend>::default()));
    let client = OperatorClient::with_parts(transport.clone(), store.clone());

    let session = client.login("gate7", "s3cret").await.unwrap();
    assert_eq!(session.token, "tok-new");
    assert_eq!(session.username, "gate7");
    assert_eq!(session.scope, Scope::Gates { assigned_gates: vec!["main-gate".into()] });
    assert_eq!(store.load(), Some(session));
    assert!(client.is_authenticated());

    // Login itself must not carry a bearer header.
    let (route, body, bearer) = &transport.calls()[0];
    assert_eq!(route, "login");
    assert_eq!(body, &json!({ "username": "gate7", "password": "s3cret" }));
    assert_eq!(bearer, &None);
}

#[tokio::test]
async fn failed_login_surfaces_server_body_and_leaves_store_empty() {
    let transport = MockTransport::replying(vec![MockTransport::ok(
        401,
        r#"{"message":"Invalid credentials"}"#,
    )]);
    let store = Arc::new(SessionStore::with_backend(Box::<MemoryBackend>::default()));
    let client = OperatorClient::with_parts(transport, store.clone());

    let err = client.login("gate7", "wrong").await.unwrap_err();
    assert_eq!(err.code_str(), "login_failed");
    assert!(err.message().contains("Invalid credentials"));
    assert!(!client.is_authenticated());
    assert_eq!(store.load(), None);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let transport = MockTransport::replying(vec![]);
    let store = store_with_token("tok");
    let client = OperatorClient::with_parts(transport, store.clone());

    assert!(client.is_authenticated());
    client.logout();
    assert!(!client.is_authenticated());
    client.logout(); // idempotent
    assert_eq!(store.load(), None);
}
