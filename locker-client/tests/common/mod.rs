//! In-process stand-in for the locker backend.
//!
//! Responses are scripted per `"METHOD /path"` key and every request is
//! recorded so tests can assert on call order, bodies and headers.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use parcel_locker_client::HttpClient;

const PREFIX: &str = "/api/v1";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Value,
    pub bearer: Option<String>,
    pub pickup_token: Option<String>,
}

impl Recorded {
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Clone)]
struct Scripted {
    status: StatusCode,
    body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    /// Queued responses per key; the last one stays for repeated calls
    responses: HashMap<String, VecDeque<Scripted>>,
    requests: Vec<Recorded>,
}

#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}{}", addr, PREFIX),
            state,
        }
    }

    pub fn client(&self) -> HttpClient {
        HttpClient::new(self.base_url.clone(), Duration::from_secs(5)).unwrap()
    }

    /// Answer `key` with `{"success": true, "data": data}`
    pub fn ok(&self, key: &str, data: Value) -> &Self {
        self.raw(key, StatusCode::OK, Some(json!({"success": true, "data": data})))
    }

    /// Answer `key` with `{"success": true}` and no data
    pub fn ok_empty(&self, key: &str) -> &Self {
        self.raw(key, StatusCode::OK, Some(json!({"success": true})))
    }

    /// Answer `key` with an error envelope
    pub fn fail(&self, key: &str, status: u16, message: &str, code: &str) -> &Self {
        self.raw(
            key,
            StatusCode::from_u16(status).unwrap(),
            Some(json!({"success": false, "error": message, "error_code": code})),
        )
    }

    pub fn raw(&self, key: &str, status: StatusCode, body: Option<Value>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry(key.to_string())
            .or_default()
            .push_back(Scripted { status, body });
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.requests().iter().map(Recorded::key).collect()
    }

    pub fn last(&self, key: &str) -> Option<Recorded> {
        self.requests().into_iter().rev().find(|r| r.key() == key)
    }
}

async fn handle(
    State(state): State<Arc<Mutex<MockState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix(PREFIX).unwrap_or(uri.path()).to_string();
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = Recorded {
        method: method.clone(),
        path: path.clone(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        bearer: header("authorization").and_then(|v| v.strip_prefix("Bearer ").map(str::to_string)),
        pickup_token: header("x-pickup-token"),
    };
    let key = recorded.key();

    let mut state = state.lock().unwrap();
    state.requests.push(recorded);

    let scripted = match state.responses.get_mut(&key) {
        Some(queue) if queue.len() > 1 => queue.pop_front(),
        Some(queue) => queue.front().cloned(),
        None => None,
    };

    match scripted {
        Some(Scripted {
            status,
            body: Some(body),
        }) => (status, Json(body)).into_response(),
        Some(Scripted { status, body: None }) => status.into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": format!("no route for {}", key), "error_code": "NOT_FOUND"})),
        )
            .into_response(),
    }
}
