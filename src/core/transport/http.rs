//! HTTP front door.
//!
//! A single fallback handler routes every inbound request:
//!
//! - `OPTIONS` on the protocol path answers the CORS preflight.
//! - `GET /` is the health check.
//! - `POST`, `GET` and `DELETE` on the protocol path open a fresh session and
//!   hand the request to its transport.
//! - Anything else is `404`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode, header},
    response::{IntoResponse, Response},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::session::SessionFactory;

const HEALTH_BANNER: &str = "Event Planner MCP server";

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "POST, GET, OPTIONS";
const ALLOW_HEADERS: &str = "content-type, mcp-session-id";
const EXPOSE_HEADERS: &str = "Mcp-Session-Id";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across requests.
#[derive(Clone)]
struct AppState {
    factory: Arc<SessionFactory>,
    rpc_path: Arc<str>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Build the router serving `factory`'s sessions.
    pub fn router(&self, factory: Arc<SessionFactory>) -> Router {
        let state = AppState {
            factory,
            rpc_path: Arc::from(self.config.rpc_path.as_str()),
        };

        Router::new()
            .fallback(front_door)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until Ctrl-C.
    pub async fn run(self, factory: SessionFactory) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(Arc::new(factory));

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on http://{}{}", addr, self.config.rpc_path);
        info!("  → Protocol: POST/GET/DELETE {}", self.config.rpc_path);
        info!("  → Health:   GET /");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Route one request.
async fn front_door(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path();
    if !path.starts_with('/') {
        return (StatusCode::BAD_REQUEST, "Missing URL").into_response();
    }

    let on_protocol_path = path == &*state.rpc_path;
    let method = request.method();

    if method == Method::OPTIONS && on_protocol_path {
        return preflight();
    }

    if method == Method::GET && path == "/" {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            HEALTH_BANNER,
        )
            .into_response();
    }

    let is_protocol_method =
        method == Method::POST || method == Method::GET || method == Method::DELETE;
    if on_protocol_path && is_protocol_method {
        let mut response = serve_protocol(&state.factory, request).await;
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
        headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static(EXPOSE_HEADERS));
        return response;
    }

    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static(EXPOSE_HEADERS));
    response
}

/// Serve a protocol request on a fresh session.
///
/// The session lives in this future. It is torn down when the exchange ends
/// or when the future is dropped because the client went away.
#[instrument(skip_all, fields(method = %request.method()))]
async fn serve_protocol(factory: &SessionFactory, request: Request<Body>) -> Response {
    let result = match factory.open() {
        Ok(session) => session.handle(request).await,
        Err(e) => Err(e),
    };

    result.unwrap_or_else(|e| {
        error!("Error handling MCP request: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    })
}
