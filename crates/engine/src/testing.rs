//! Shared test doubles: an in-memory store, a warning collector and a local
//! JSON server for the HTTP strategy.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use remote_json_envs_api::{StoreError, StoreResolver};
use remote_json_envs_types::RawResult;
use serde_json::{Map, Value, json};

use crate::WarningSink;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
    failures: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, address: &str, value: Value) -> Self {
        self.values.insert(address.to_string(), value);
        self
    }

    pub fn with_failure(mut self, address: &str) -> Self {
        self.failures.insert(address.to_string());
        self
    }

    pub fn with_delay(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreResolver for MemoryStore {
    async fn resolve(&self, address: &str) -> Result<RawResult, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(address) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(address) {
            return Err(StoreError::CommandFailed {
                program: "memory".into(),
                status: "exit status: 255".into(),
                stderr: format!("AccessDeniedException for {address}"),
            });
        }
        Ok(RawResult::from(self.values.get(address).cloned()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[derive(Debug, Default)]
pub struct CollectingWarnings {
    messages: Mutex<Vec<String>>,
}

impl CollectingWarnings {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|messages| messages.clone()).unwrap_or_default()
    }
}

impl WarningSink for CollectingWarnings {
    fn warn(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// Serve a handful of JSON routes on an ephemeral port and return the base URL.
pub async fn spawn_json_server() -> String {
    let app = Router::new()
        .route("/env", get(|| async { Json(json!({"app": {"API_URL": "https://api.example.com"}})) }))
        .route("/status/{code}", get(status))
        .route("/text", get(|| async { "plain text, not json" }))
        .route("/echo", post(|Json(body): Json<Value>| async move { Json(json!({"echo": body})) }))
        .route("/headers", get(headers))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Json(json!({"slow": {"SLOW": "1"}}))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let addr = listener.local_addr().expect("test server address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": status.as_u16()})))
}

async fn headers(headers: HeaderMap) -> Json<Value> {
    let map: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), json!(value.to_str().unwrap_or_default())))
        .collect();
    Json(json!({"headers": map}))
}
