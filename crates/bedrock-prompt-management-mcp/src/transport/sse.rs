//! HTTP transport: SSE sessions, direct JSON-RPC over POST, and /health.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json as AxumJson, Response,
    },
    routing::{get, post},
    Router,
};
use futures::{stream, Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId, SERVER_NAME};

/// Outbound queue depth per SSE session.
const SESSION_BUFFER: usize = 32;

type SessionMap = Arc<Mutex<HashMap<String, mpsc::Sender<Value>>>>;

pub struct ServerState {
    handler: ProtocolHandler,
    token: Option<String>,
    sessions: SessionMap,
}

impl ServerState {
    fn session(&self, id: &str) -> Option<mpsc::Sender<Value>> {
        lock(&self.sessions).get(id).cloned()
    }
}

fn lock(
    sessions: &SessionMap,
) -> std::sync::MutexGuard<'_, HashMap<String, mpsc::Sender<Value>>> {
    sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Removes the session once its event stream is dropped.
struct SessionGuard {
    id: String,
    sessions: SessionMap,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        lock(&self.sessions).remove(&self.id);
        tracing::info!("SSE session {} closed", self.id);
    }
}

pub struct SseTransport {
    state: Arc<ServerState>,
}

impl SseTransport {
    pub fn new(handler: ProtocolHandler, token: Option<String>) -> Self {
        Self {
            state: Arc::new(ServerState {
                handler,
                token,
                sessions: Arc::new(Mutex::new(HashMap::new())),
            }),
        }
    }

    pub fn router(&self) -> Router {
        let state = self.state.clone();
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/sse", get(handle_sse))
            .route("/messages", post(handle_session_message))
            .route("/messages/", post(handle_session_message))
            .route("/mcp", post(handle_request))
            .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
            .route("/health", get(handle_health))
            .layer(cors)
            .with_state(state)
    }

    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("HTTP transport listening on {addr}");
        if self.state.token.is_some() {
            tracing::info!("Bearer token authentication enabled");
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| McpError::Transport(e.to_string()))
    }
}

fn error_response(status: StatusCode, error: McpError) -> Response {
    let body = serde_json::to_value(error.to_json_rpc_error(RequestId::Null)).unwrap_or_default();
    (status, AxumJson(body)).into_response()
}

/// /health bypasses this layer.
async fn auth_layer(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    if let Some(expected) = &state.token {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);

        if !authorized {
            tracing::warn!("Rejected unauthenticated request to {}", request.uri().path());
            return error_response(StatusCode::UNAUTHORIZED, McpError::Unauthorized);
        }
    }

    next.run(request).await
}

/// Opens a session. The first event names the URL to POST messages to;
/// responses then arrive as `message` events.
async fn handle_sse(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = uuid::Uuid::new_v4().simple().to_string();
    let (tx, rx) = mpsc::channel::<Value>(SESSION_BUFFER);
    lock(&state.sessions).insert(session_id.clone(), tx);
    tracing::info!("SSE session {session_id} opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages/?session_id={session_id}"));
    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let messages = ReceiverStream::new(rx).map(move |value| {
        let _session = &guard;
        Ok::<_, Infallible>(Event::default().event("message").data(value.to_string()))
    });

    Sse::new(stream::once(async move { Ok(endpoint) }).chain(messages))
        .keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: String,
}

async fn handle_session_message(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    let Some(sender) = state.session(&query.session_id) else {
        return error_response(
            StatusCode::NOT_FOUND,
            McpError::SessionNotFound(query.session_id),
        );
    };

    let text = String::from_utf8_lossy(&body);
    if let Some(response) = state.handler.handle_text(&text).await {
        if sender.send(response).await.is_err() {
            tracing::warn!("SSE session {} went away before its reply", query.session_id);
            lock(&state.sessions).remove(&query.session_id);
            return error_response(
                StatusCode::GONE,
                McpError::SessionNotFound(query.session_id),
            );
        }
    }

    StatusCode::ACCEPTED.into_response()
}

/// Direct request/response; notifications get 202 with no body.
async fn handle_request(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let text = String::from_utf8_lossy(&body);
    match state.handler.handle_text(&text).await {
        Some(response) => AxumJson(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    let sessions = lock(&state.sessions).len();
    AxumJson(serde_json::json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": sessions,
    }))
}
