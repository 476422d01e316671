//! Stateless streamable-HTTP transport.
//!
//! One transport serves exactly one HTTP request. It never issues a session
//! id, never opens a server-initiated stream and always answers with plain
//! JSON instead of SSE.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json,
    body::Body,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{TransportError, TransportResult};
use super::jsonrpc::{JsonRpcMessage, JsonRpcResponse, SERVER_ERROR};
use crate::core::server::{EventServer, SUPPORTED_PROTOCOL_VERSIONS};

/// Largest request body accepted on the protocol endpoint.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// Per-request transport answering in JSON response mode.
#[derive(Default)]
pub struct StatelessHttpTransport {
    server: Option<Arc<EventServer>>,
    closed: AtomicBool,
}

impl StatelessHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the server that answers this transport's messages.
    pub fn connect(&mut self, server: Arc<EventServer>) -> TransportResult<()> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        if self.server.is_some() {
            return Err(TransportError::AlreadyConnected);
        }
        self.server = Some(server);
        Ok(())
    }

    /// Close the transport. Returns `true` only for the call that closed it.
    pub fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Handle one HTTP request on the protocol endpoint.
    pub async fn handle_request(&self, request: Request<Body>) -> TransportResult<Response> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let server = self.server.as_ref().ok_or(TransportError::NotConnected)?;

        if request.method() == Method::POST {
            self.handle_post(server, request).await
        } else if request.method() == Method::DELETE {
            debug!("Client ended the session");
            self.close();
            Ok(StatusCode::OK.into_response())
        } else {
            Ok(method_not_allowed())
        }
    }

    async fn handle_post(
        &self,
        server: &EventServer,
        request: Request<Body>,
    ) -> TransportResult<Response> {
        let (parts, body) = request.into_parts();

        if !accepts_json_and_sse(&parts.headers) {
            return Ok(reject(
                StatusCode::NOT_ACCEPTABLE,
                "Not Acceptable: Client must accept both application/json and text/event-stream",
            ));
        }

        if !is_json_content(&parts.headers) {
            return Ok(reject(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Media Type: Content-Type must be application/json",
            ));
        }

        let bytes: Bytes = match Limited::new(body, MAX_BODY_BYTES).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.is::<LengthLimitError>() => {
                warn!("Rejected request body larger than {} bytes", MAX_BODY_BYTES);
                return Ok(reject(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "Payload Too Large: request body exceeds 4 MB",
                ));
            }
            Err(e) => return Err(TransportError::body(e.to_string())),
        };

        let payload: Value = match serde_json::from_slice(&bytes) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Rejected request body: {}", e);
                let response = JsonRpcResponse::parse_error(format!("Parse error: {}", e));
                return Ok((StatusCode::BAD_REQUEST, Json(response)).into_response());
            }
        };

        let (values, is_batch) = match payload {
            Value::Array(values) => (values, true),
            value => (vec![value], false),
        };

        let Some(messages) = parse_messages(values) else {
            let response = JsonRpcResponse::invalid_request(Value::Null, "Invalid Request");
            return Ok((StatusCode::BAD_REQUEST, Json(response)).into_response());
        };

        let initializing = messages
            .iter()
            .filter(|m| matches!(m, JsonRpcMessage::Request(r) if r.method == "initialize"))
            .count();
        if initializing > 0 && messages.len() > 1 {
            let response = JsonRpcResponse::invalid_request(
                Value::Null,
                "Invalid Request: initialize must be sent on its own",
            );
            return Ok((StatusCode::BAD_REQUEST, Json(response)).into_response());
        }

        if initializing == 0 && !supports_protocol_version(&parts.headers) {
            return Ok(reject(
                StatusCode::BAD_REQUEST,
                "Bad Request: Unsupported protocol version",
            ));
        }

        let mut pending = Vec::new();
        for message in messages {
            match message {
                JsonRpcMessage::Request(request) => pending.push(server.handle_request(request)),
                JsonRpcMessage::Notification(notification) => {
                    server.handle_notification(&notification)
                }
                JsonRpcMessage::Response => debug!("Ignoring client response"),
            }
        }

        if pending.is_empty() {
            return Ok(StatusCode::ACCEPTED.into_response());
        }

        let responses = futures::future::join_all(pending).await;
        let body = match (is_batch, responses.as_slice()) {
            (false, [response]) => serde_json::to_value(response)?,
            _ => serde_json::to_value(&responses)?,
        };

        Ok((StatusCode::OK, Json(body)).into_response())
    }
}

/// Decode every message of a payload. An empty batch or any malformed entry
/// rejects the whole payload.
fn parse_messages(values: Vec<Value>) -> Option<Vec<JsonRpcMessage>> {
    if values.is_empty() {
        return None;
    }
    values.into_iter().map(JsonRpcMessage::parse).collect()
}

fn media_types(headers: &HeaderMap, name: header::HeaderName) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|item| item.split(';').next())
        .map(|item| item.trim().to_ascii_lowercase())
        .collect()
}

fn accepts_json_and_sse(headers: &HeaderMap) -> bool {
    let accepted = media_types(headers, header::ACCEPT);
    accepted.iter().any(|m| m == "application/json")
        && accepted.iter().any(|m| m == "text/event-stream")
}

fn is_json_content(headers: &HeaderMap) -> bool {
    media_types(headers, header::CONTENT_TYPE)
        .first()
        .is_some_and(|m| m == "application/json")
}

/// A missing header is accepted; a present one must name a supported revision.
fn supports_protocol_version(headers: &HeaderMap) -> bool {
    match headers.get(PROTOCOL_VERSION_HEADER) {
        None => true,
        Some(value) => value
            .to_str()
            .is_ok_and(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(&v.trim())),
    }
}

fn reject(status: StatusCode, message: &str) -> Response {
    let body = JsonRpcResponse::error(Value::Null, SERVER_ERROR, message);
    (status, Json(body)).into_response()
}

fn method_not_allowed() -> Response {
    let mut response = reject(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.");
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("POST, DELETE"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::eventbrite::testing::RecordingGateway;
    use crate::domains::resources::{ResourceService, WidgetDocument};
    use crate::domains::tools::ToolRegistry;
    use serde_json::json;

    fn connected() -> StatelessHttpTransport {
        let config = Config::default();
        let server = EventServer::new(
            &config.server,
            ToolRegistry::new(&config, RecordingGateway::responding(json!({}))),
            ResourceService::new(WidgetDocument::new("<p></p>")),
        );
        let mut transport = StatelessHttpTransport::new();
        transport.connect(Arc::new(server)).unwrap();
        transport
    }

    fn post(body: &str) -> Request<Body> {
        Request::post("/mcp")
            .header(header::ACCEPT, "application/json, text/event-stream")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_requires_connection() {
        let transport = StatelessHttpTransport::new();
        let result = transport.handle_request(post("{}")).await;
        assert!(matches!(result, Err(TransportError::NotConnected)));
    }

    #[tokio::test]
    async fn test_closed_transport_refuses_requests() {
        let transport = connected();
        assert!(transport.close());
        assert!(!transport.close());

        let result = transport.handle_request(post("{}")).await;
        assert!(matches!(result, Err(TransportError::Closed)));
    }

    #[tokio::test]
    async fn test_single_request() {
        let transport = connected();
        let response = transport
            .handle_request(post(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("mcp-session-id").is_none());
        let body = json_body(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["result"], json!({}));
    }

    #[tokio::test]
    async fn test_batch_request() {
        let transport = connected();
        let response = transport
            .handle_request(post(
                r#"[{"jsonrpc":"2.0","id":1,"method":"ping"},
                    {"jsonrpc":"2.0","method":"notifications/initialized"},
                    {"jsonrpc":"2.0","id":2,"method":"tools/list"}]"#,
            ))
            .await
            .unwrap();

        let body = json_body(response).await;
        let responses = body.as_array().unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
    }

    #[tokio::test]
    async fn test_notification_only_is_accepted() {
        let transport = connected();
        let response = transport
            .handle_request(post(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_missing_accept() {
        let transport = connected();
        let request = Request::post("/mcp")
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = transport.handle_request(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_rejects_non_json_content() {
        let transport = connected();
        let request = Request::post("/mcp")
            .header(header::ACCEPT, "application/json, text/event-stream")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("{}"))
            .unwrap();

        let response = transport.handle_request(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let transport = connected();
        let response = transport.handle_request(post("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_invalid_message() {
        let transport = connected();
        for body in [r#"{"id":1}"#, "[]", r#"[{"jsonrpc":"2.0","id":1,"method":"ping"}, 3]"#] {
            let response = transport.handle_request(post(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await["error"]["code"], -32600);
        }
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let transport = connected();
        let request = Request::get("/mcp").body(Body::empty()).unwrap();
        let response = transport.handle_request(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST, DELETE");
    }

    #[tokio::test]
    async fn test_delete_closes_transport() {
        let transport = connected();
        let request = Request::delete("/mcp").body(Body::empty()).unwrap();
        let response = transport.handle_request(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(transport.is_closed());
    }

    #[tokio::test]
    async fn test_rejects_oversized_body() {
        let transport = connected();
        let padding = "x".repeat(MAX_BODY_BYTES);
        let body = format!(r#"{{"jsonrpc":"2.0","id":1,"method":"ping","params":{{"pad":"{}"}}}}"#, padding);

        let response = transport.handle_request(post(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["error"]["code"], SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_accepts_body_under_limit() {
        let transport = connected();
        let padding = "x".repeat(1024 * 1024);
        let body = format!(r#"{{"jsonrpc":"2.0","id":1,"method":"ping","params":{{"pad":"{}"}}}}"#, padding);

        let response = transport.handle_request(post(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_protocol_version() {
        let transport = connected();
        let mut request = post(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
        request
            .headers_mut()
            .insert(PROTOCOL_VERSION_HEADER, HeaderValue::from_static("1999-01-01"));

        let response = transport.handle_request(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Bad Request: Unsupported protocol version");
    }

    #[tokio::test]
    async fn test_accepts_supported_protocol_version() {
        let transport = connected();
        let mut request = post(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
        request
            .headers_mut()
            .insert(PROTOCOL_VERSION_HEADER, HeaderValue::from_static("2025-03-26"));

        let response = transport.handle_request(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_initialize_ignores_version_header() {
        let transport = connected();
        let mut request = post(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18","capabilities":{},"clientInfo":{"name":"c","version":"1"}}}"#,
        );
        request
            .headers_mut()
            .insert(PROTOCOL_VERSION_HEADER, HeaderValue::from_static("1999-01-01"));

        let response = transport.handle_request(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_initialize_inside_batch() {
        let transport = connected();
        let body = r#"[
            {"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18","capabilities":{},"clientInfo":{"name":"c","version":"1"}}},
            {"jsonrpc":"2.0","id":2,"method":"tools/list"}
        ]"#;

        let response = transport.handle_request(post(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], -32600);
    }
}
