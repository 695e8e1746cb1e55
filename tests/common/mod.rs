//! Shared utilities for integration testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use lead_gateway::config::GatewayConfig;
use lead_gateway::lifecycle::Shutdown;
use lead_gateway::GatewayServer;

/// A mock messaging API capturing every sendMessage body it receives.
pub struct MockMessagingApi {
    pub api_base: String,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl MockMessagingApi {
    /// Bodies captured so far.
    pub fn captured(&self) -> Vec<Value> {
        self.bodies.lock().expect("capture mutex poisoned").clone()
    }

    /// The `text` field of every captured body.
    pub fn captured_texts(&self) -> Vec<String> {
        self.captured()
            .iter()
            .filter_map(|b| b["text"].as_str().map(str::to_owned))
            .collect()
    }
}

#[derive(Clone)]
struct MockState {
    bodies: Arc<Mutex<Vec<Value>>>,
    status: u16,
}

async fn send_message(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state
        .bodies
        .lock()
        .expect("capture mutex poisoned")
        .push(body);

    if state.status == 200 {
        (
            StatusCode::OK,
            Json(json!({ "ok": true, "result": { "message_id": 42 } })),
        )
            .into_response()
    } else {
        (
            StatusCode::from_u16(state.status).expect("test status is valid"),
            Json(json!({ "ok": false, "description": "Bad Request: chat not found" })),
        )
            .into_response()
    }
}

/// Start a mock messaging API answering every bot call with `status`.
pub async fn start_mock_messaging(status: u16) -> MockMessagingApi {
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/{bot}/sendMessage", post(send_message))
        .with_state(MockState {
            bodies: bodies.clone(),
            status,
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockMessagingApi {
        api_base: format!("http://{addr}"),
        bodies,
    }
}

/// A gateway instance running on an ephemeral loopback port.
pub struct TestGateway {
    pub base_url: String,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Boot the gateway with the given configuration.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let shutdown = Shutdown::new();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let receiver = shutdown.subscribe();
    let server = GatewayServer::new(config).expect("server builds");

    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestGateway {
        base_url: format!("http://{addr}"),
        shutdown,
    }
}

/// Base configuration pointing at the given mock messaging API, with
/// rate limiting off. Tests opt back in per policy.
pub fn test_config(api_base: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.messaging.bot_token = Some("123:test-token".into());
    config.messaging.chat_id = Some("-100200300".into());
    config.messaging.api_base = api_base.into();
    config.rate_limit.enabled = false;
    config
}

/// Non-pooled client so every request opens a fresh connection.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// A submit-application body that passes every constraint.
#[allow(dead_code)]
pub fn valid_application() -> Value {
    json!({
        "name": "Иван Иванов",
        "phone": "+79991234567",
        "address": "г. Москва, ул. Ленина, 1",
        "selectedTariff": "Стандарт"
    })
}
