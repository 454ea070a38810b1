//! Shared helpers for the API integration tests.
//!
//! Builds the real router over a [`MemoryStore`] and a scripted completion
//! provider, so tests exercise the production middleware stack without
//! network access.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use fixio_ai::{CompletionError, CompletionGateway, CompletionProvider, CompletionRequest};
use fixio_api::auth::jwt::{sign_claims, Claims, JwtConfig, UserMetadata, AUTHENTICATED_AUDIENCE};
use fixio_api::config::{OpenAiConfig, ServerConfig, StoreConfig};
use fixio_api::router::build_app_router;
use fixio_api::state::AppState;
use fixio_core::account::AudienceCategory;
use fixio_core::types::DbId;
use fixio_store::MemoryStore;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        upstream_timeout_secs: 30,
        openai: OpenAiConfig {
            api_key: "sk-test".to_string(),
            base_url: "http://127.0.0.1:9/v1".to_string(),
        },
        store: StoreConfig::Memory,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Scripted completion provider
// ---------------------------------------------------------------------------

/// One scripted provider outcome.
#[derive(Debug, Clone)]
pub enum Scripted {
    Answer(Option<String>),
    Failure { status: u16, body: String },
}

/// Replays scripted outcomes in order (the last one repeats) and records
/// every request.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn answering(text: &str) -> Arc<Self> {
        Self::scripted([Scripted::Answer(Some(text.to_string()))])
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Self::scripted([Scripted::Failure {
            status,
            body: body.to_string(),
        }])
    }

    pub fn scripted(outcomes: impl IntoIterator<Item = Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<Option<String>, CompletionError> {
        self.seen.lock().unwrap().push(request);
        let mut script = self.script.lock().unwrap();
        let outcome = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        match outcome.unwrap_or(Scripted::Answer(None)) {
            Scripted::Answer(text) => Ok(text),
            Scripted::Failure { status, body } => Err(CompletionError::Api { status, body }),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// The router plus handles on its fakes.
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<ScriptedProvider>,
    pub store: Arc<MemoryStore>,
}

/// Build the full application router, with all middleware layers, over a
/// fresh in-memory store and the given provider.
pub fn build_test_app(provider: Arc<ScriptedProvider>) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        config: Arc::new(config.clone()),
        gateway: CompletionGateway::new(provider.clone()),
        projects: store.clone(),
        images: store.clone(),
    };
    TestApp {
        router: build_app_router(state, &config),
        provider,
        store,
    }
}

/// A test app whose provider always answers `text`.
pub fn app_answering(text: &str) -> TestApp {
    build_test_app(ScriptedProvider::answering(text))
}

// ---------------------------------------------------------------------------
// Session tokens
// ---------------------------------------------------------------------------

/// A signed session token for a new account id. Returns `(token, id)`.
pub fn session_token(user_type: AudienceCategory) -> (String, DbId) {
    let id = DbId::new_v4();
    let claims = Claims {
        sub: id,
        email: Some(format!("{id}@example.com")),
        aud: Some(AUTHENTICATED_AUDIENCE.to_string()),
        exp: chrono::Utc::now().timestamp() + 3600,
        user_metadata: UserMetadata {
            name: Some("Sanne".to_string()),
            user_type,
            subscription_plan: None,
        },
    };
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
    };
    (sign_claims(&claims, &config).unwrap(), id)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_authed(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn delete_authed(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, builder(Method::DELETE, uri, Some(token)).body(Body::empty()).unwrap()).await
}

/// Send `body` as JSON with the given method, optionally authenticated.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let request = builder(method, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body, None).await
}

/// POST a body that is labelled JSON but sent verbatim.
pub async fn post_raw_json(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    let request = builder(Method::POST, uri, None)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
