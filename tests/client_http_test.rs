//! ProbModelSEED client integration tests
//!
//! Drives `ProbModelSeedClient` over the real reqwest `HttpTransport`
//! against a `wiremock` mock server, checking both what goes on the wire and
//! how each kind of reply settles the call.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use probmodelseed::config::Config;
use probmodelseed::rpc::{Authorization, Callbacks, ProbModelSeedClient};
use probmodelseed::RpcError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn endpoint(server: &MockServer) -> String {
    format!("{}/services/ProbModelSEED", server.uri())
}

fn client(server: &MockServer, auth: Authorization) -> ProbModelSeedClient {
    ProbModelSeedClient::new(Some(&endpoint(server)), auth).expect("client builds")
}

fn json_reply(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_string().into_bytes(), "application/json")
}

/// Shared in-memory sink for captured log output.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_request_envelope_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/ProbModelSEED"))
        .and(header("Content-Type", "application/json"))
        .and(header("Authorization", "un=alice|tokenid=1"))
        .and(body_partial_json(json!({
            "method": "ProbModelSEED.get_model",
            "version": "1.1",
            "params": [{"model": "/alice/home/models/m1"}]
        })))
        .respond_with(json_reply(200, json!({"result": [{"id": "m1"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Authorization::with_token("un=alice|tokenid=1", "alice"));
    let pending = client.get_model(json!({"model": "/alice/home/models/m1"}), Callbacks::none());
    let id = pending.id().to_string();
    let model = pending.await.expect("call resolves");

    assert_eq!(model, json!({"id": "m1"}));

    let requests = server.received_requests().await.expect("recording enabled");
    let sent: Value = serde_json::from_slice(&requests[0].body).expect("JSON body");
    assert_eq!(sent["id"], json!(id));
    assert!(id.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_anonymous_client_sends_no_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(json_reply(200, json!({"result": [[]]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Authorization::anonymous());
    let models = client.list_models(Callbacks::none()).await.expect("resolves");
    assert_eq!(models, json!([]));
}

#[tokio::test]
async fn test_provider_returning_none_omits_header_despite_static_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(json_reply(200, json!({"result": [true]})))
        .mount(&server)
        .await;

    let auth = Authorization::with_token("static", "alice").with_provider(|| None::<String>);
    let client = client(&server, auth);
    let value = client
        .delete_model(json!({"model": "m1"}), Callbacks::none())
        .await
        .expect("resolves");
    assert_eq!(value, json!(true));
}

// ---------------------------------------------------------------------------
// Outcome classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_models_round_trip_invokes_success_callback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ProbModelSEED.list_models", "params": []})))
        .respond_with(json_reply(200, json!({"result": [["m1", "m2"]]})))
        .mount(&server)
        .await;

    let client = client(&server, Authorization::anonymous());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let failures = Arc::new(Mutex::new(Vec::new()));
    let (s, f) = (Arc::clone(&seen), Arc::clone(&failures));

    let models = client
        .list_models(Callbacks::new(
            move |v| s.lock().unwrap().push(v),
            move |e| f.lock().unwrap().push(e),
        ))
        .await
        .expect("resolves");

    assert_eq!(models, json!(["m1", "m2"]));
    assert_eq!(*seen.lock().unwrap(), vec![json!(["m1", "m2"])]);
    assert!(failures.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_server_error_is_rejected_with_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(json_reply(
            500,
            json!({"error": {"name": "JSONRPCError", "message": "boom"}}),
        ))
        .mount(&server)
        .await;

    let client = client(&server, Authorization::anonymous());
    let err = client
        .flux_balance_analysis(json!({"model": "m1"}), Callbacks::none())
        .await
        .unwrap_err();

    assert_eq!(err.status(), 500);
    assert_eq!(err.error_value()["message"], "boom");
    assert_eq!(err.to_value()["status"], 500);
}

#[tokio::test]
async fn test_unparseable_success_body_is_service_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = client(&server, Authorization::anonymous());
    let err = client
        .export_media(json!({"media": "m"}), Callbacks::none())
        .await
        .unwrap_err();

    assert_eq!(err.status(), 503);
    let rejection = err.to_value();
    assert_eq!(rejection["url"], json!(endpoint(&server)));
    assert_eq!(rejection["resp"], "not json at all");
}

#[tokio::test]
async fn test_non_json_failure_body_becomes_unknown_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client(&server, Authorization::anonymous());
    let err = client
        .gapfill_model(json!({}), Callbacks::none())
        .await
        .unwrap_err();

    assert_eq!(err.error_value(), json!("Unknown error - Bad Gateway"));
}

#[tokio::test]
async fn test_empty_failure_body_is_unknown_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server, Authorization::anonymous());
    let err = client
        .get_feature(json!({}), Callbacks::none())
        .await
        .unwrap_err();

    assert_eq!(err, RpcError::unknown());
    assert_eq!(err.to_value(), json!({"status": 500, "error": "Unknown Error"}));
}

#[tokio::test]
async fn test_unreachable_server_is_unknown_error() {
    let client =
        ProbModelSeedClient::new(Some("http://127.0.0.1:9/services/ProbModelSEED"), Authorization::anonymous())
            .expect("client builds");

    let failures = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::clone(&failures);
    let err = client
        .import_media(json!({}), Callbacks::none().on_error(move |e| f.lock().unwrap().push(e)))
        .await
        .unwrap_err();

    assert_eq!(err, RpcError::unknown());
    assert_eq!(*failures.lock().unwrap(), vec![RpcError::unknown()]);
}

#[tokio::test]
async fn test_configured_timeout_rejects_slow_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(json_reply(200, json!({"result": ["late"]})).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.service.url = endpoint(&server);
    config.service.timeout_seconds = Some(1);
    let client = ProbModelSeedClient::from_config(&config).expect("client builds");

    let err = client
        .reconstruct_fbamodel(json!({}), Callbacks::none())
        .await
        .unwrap_err();
    assert_eq!(err, RpcError::unknown());
}

#[tokio::test]
async fn test_abort_settles_in_flight_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(json_reply(200, json!({"result": ["late"]})).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let client = client(&server, Authorization::anonymous());
    let pending = client.compare_regions(json!({}), Callbacks::none());
    tokio::time::sleep(Duration::from_millis(50)).await;
    pending.abort();

    let err = tokio::time::timeout(Duration::from_secs(2), pending)
        .await
        .expect("abort settles promptly")
        .unwrap_err();
    assert_eq!(err, RpcError::unknown());
}

// ---------------------------------------------------------------------------
// Deprecated aliases
// ---------------------------------------------------------------------------

#[tokio::test]
#[allow(deprecated)]
async fn test_deprecation_warning_logged_once_per_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(json_reply(200, json!({"result": [1]})))
        .expect(3)
        .mount(&server)
        .await;

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let client = client(&server, Authorization::anonymous());
    client.list_models_async(Callbacks::none()).await.unwrap();
    client
        .get_model_async(json!({"model": "m1"}), Callbacks::none())
        .await
        .unwrap();
    client
        .get_model(json!({"model": "m1"}), Callbacks::none())
        .await
        .unwrap();

    let output = logs.contents();
    assert_eq!(output.matches("DEPRECATION WARNING").count(), 1);
    assert!(output.contains("without the '_async' suffix"));
    assert!(client.deprecation_warned());
}
