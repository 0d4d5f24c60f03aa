//! Main bridge server implementation
//!
//! Wires the WebSocket endpoint, the health check and the static UI into one
//! axum router behind the CORS layer, and hosts one `ConnectionSession` per
//! upgraded socket.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{
        Request, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::{HeaderValue, Method, StatusCode, header, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use shared::{ProcessId, process_debug, process_error, process_info, process_warn};

use crate::config::{BridgeConfig, CorsPolicy};
use crate::error::{BridgeError, BridgeResult};
use crate::protocol;
use crate::services::{AdbCommandRunner, ConnectionSession, NOTIFICATION_BUFFER, Notifier, heartbeat};
use crate::state::BridgeState;
use crate::types::{InboundFrame, SessionId};

/// Path of the WebSocket endpoint
pub const WEBSOCKET_PATH: &str = "/ws";

/// Main bridge server
#[derive(Clone)]
pub struct BridgeServer {
    state: Arc<BridgeState>,
}

impl BridgeServer {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            state: Arc::new(BridgeState::new(Arc::new(config))),
        }
    }

    /// Build the axum router with all routes
    pub fn build_router(&self) -> Router {
        let config = &self.state.config;

        Router::new()
            .route(WEBSOCKET_PATH, get(websocket_handler))
            .route("/health", get(health_check))
            // Static UI (index.html + assets)
            .fallback_service(ServeDir::new(&config.static_dir))
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(answer_options))
                    .layer(SetResponseHeaderLayer::overriding(
                        header::ACCESS_CONTROL_ALLOW_METHODS,
                        HeaderValue::from_static(ALLOWED_METHODS),
                    ))
                    .layer(SetResponseHeaderLayer::overriding(
                        header::ACCESS_CONTROL_ALLOW_HEADERS,
                        HeaderValue::from_static(ALLOWED_HEADERS),
                    ))
                    .layer(cors_layer(&config.cors))
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F) -> BridgeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.state.config.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| BridgeError::ServerStartupFailed { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> BridgeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        process_info!(ProcessId::current(), "🌐 Bridge listening on http://{}", local_addr);
        process_info!(
            ProcessId::current(),
            "📺 WebSocket endpoint at ws://{}{}, UI served from {}",
            local_addr,
            WEBSOCKET_PATH,
            self.state.config.static_dir.display()
        );

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }

    /// Get server state for external access
    pub fn state(&self) -> &Arc<BridgeState> {
        &self.state
    }
}

/// `Access-Control-Allow-Methods` sent on every response
pub const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";

/// `Access-Control-Allow-Headers` sent on every response
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Build the origin half of the CORS policy
///
/// A wildcard policy answers `*`; a list echoes the request origin only when
/// it is listed. Methods and headers are set on every response by the router.
pub fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let layer = CorsLayer::new();

    match policy {
        CorsPolicy::Any => layer.allow_origin(AllowOrigin::any()),
        CorsPolicy::List(_) => {
            let policy = policy.clone();
            layer.allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| {
                    policy.allow_origin(origin.to_str().ok()).is_some()
                },
            ))
        }
    }
}

/// Answer every `OPTIONS` request with an empty `204`
async fn answer_options(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;

    if is_options {
        *response.status_mut() = StatusCode::NO_CONTENT;
        *response.body_mut() = Body::empty();
        response.headers_mut().remove(header::CONTENT_LENGTH);
        response.headers_mut().remove(header::CONTENT_TYPE);
        response.headers_mut().remove(header::ALLOW);
    }
    response
}

/// Map an axum frame onto the session's transport-agnostic view
pub fn classify_frame(frame: Result<Message, axum::Error>) -> InboundFrame {
    match frame {
        Ok(Message::Text(text)) => InboundFrame::Text(text),
        Ok(Message::Close(_)) => InboundFrame::Closed,
        Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_)) => InboundFrame::Ignored,
        Err(e) => InboundFrame::Failed(e.to_string()),
    }
}

// HTTP Handlers

/// Handle WebSocket upgrades
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<BridgeState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Host one session on an upgraded socket
async fn handle_websocket(socket: WebSocket, state: Arc<BridgeState>) {
    let session_id = SessionId::new();
    let live = state.increment_session_count();
    process_info!(ProcessId::current(), "🔗 New WebSocket session {} ({} live)", session_id, live);

    let (mut sender, receiver) = socket.split();
    let (notifier, mut rx) = Notifier::channel(NOTIFICATION_BUFFER);

    let ping_period = state.config.heartbeat_interval;

    // Single writer: one notification per text frame, in queue order, plus pings
    let writer_id = session_id.clone();
    let outgoing_task = tokio::spawn(async move {
        let mut pings = heartbeat::ping_interval(ping_period);
        loop {
            let message = tokio::select! {
                notification = rx.recv() => match notification {
                    Some(notification) => Message::Text(protocol::encode(&notification)),
                    None => break,
                },
                _ = pings.tick() => Message::Ping(Vec::new()),
            };
            if let Err(e) = sender.send(message).await {
                process_warn!(ProcessId::current(), "Failed to send to session {}: {}", writer_id, e);
                break;
            }
        }
        process_debug!(ProcessId::current(), "Outgoing task ended for session {}", writer_id);
    });

    let runner = AdbCommandRunner::from_config(&state.config);
    let session = ConnectionSession::new(session_id.clone(), runner, notifier);
    let inbound = heartbeat::watch_inbound(receiver.map(classify_frame), heartbeat::deadline_for(ping_period));
    session.run(inbound).await;

    // The session owned the last notifier, so the writer drains and stops
    if let Err(e) = outgoing_task.await {
        process_error!(ProcessId::current(), "Outgoing task for session {} failed: {}", session_id, e);
    }

    let live = state.decrement_session_count();
    process_info!(ProcessId::current(), "🔌 WebSocket session {} ended ({} live)", session_id, live);
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<BridgeState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "uptime": state.get_uptime_seconds(),
        "sessions": state.get_session_count(),
    }))
}
