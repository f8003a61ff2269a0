//! Shared doubles for the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde_json::{json, Value};
use sysfree_client::adapters::MemoryTokenStore;
use sysfree_client::config::Config;
use sysfree_client::state::AppState;
use sysfree_core::ports::{PortResult, Transport};
use sysfree_core::wire::{ApiRequest, ApiResponse};

type Handler = dyn Fn(&ApiRequest) -> ApiResponse + Send + Sync;

/// A backend answering through a closure and recording every request.
///
/// Each call yields once before answering so concurrent requests interleave.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(handler: impl Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.seen.lock().unwrap().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> PortResult<ApiResponse> {
        self.seen.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        Ok((self.handler)(request))
    }
}

pub fn ok(body: Value) -> ApiResponse {
    ApiResponse::json_body(200, &body)
}

pub fn status(code: u16, body: Value) -> ApiResponse {
    ApiResponse::json_body(code, &body)
}

pub fn unauthorized() -> ApiResponse {
    status(401, json!({ "detail": "Given token not valid for any token type" }))
}

pub fn profile() -> Value {
    json!({
        "id": 7,
        "email": "ana@example.com",
        "nombres": "Ana",
        "apellidos": "Vera",
        "is_staff": true,
        "is_active": true
    })
}

/// An unsigned JWT whose `exp` is `offset_secs` away from now.
pub fn jwt(offset_secs: i64) -> String {
    let claims = json!({ "exp": Utc::now().timestamp() + offset_secs, "user_id": 7 });
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// Application state over the scripted backend and an in-memory token store.
pub fn app(transport: Arc<ScriptedTransport>) -> (AppState, Arc<MemoryTokenStore>) {
    let config = Arc::new(Config::from_vars(|_| None).unwrap());
    let tokens = Arc::new(MemoryTokenStore::default());
    let state = AppState::with_ports(config, transport, tokens.clone());
    (state, tokens)
}
