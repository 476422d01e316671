//! MCP protocol server for one session.
//!
//! An `EventServer` owns the tool registry and resource service bound to a
//! single session and answers the JSON-RPC methods the event planner
//! supports. It holds no state shared with other sessions.

use std::sync::atomic::{AtomicBool, Ordering};

use rmcp::model::{JsonObject, ServerCapabilities};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::config::ServerConfig;
use super::transport::jsonrpc::{JsonRpcRequest, JsonRpcResponse, RESOURCE_NOT_FOUND};
use crate::domains::resources::{ResourceError, ResourceService};
use crate::domains::tools::{ToolInvocation, ToolRegistry};

/// Protocol revisions this server speaks, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

const INSTRUCTIONS: &str = "Event planner backed by Eventbrite. Use getAllEvents to list the \
     organization's events, getEvent to load one event by id and buyTicket to get the link \
     where tickets can be bought.";

/// Pick the protocol version to answer `initialize` with.
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
        .copied()
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}

/// The protocol server of one session.
pub struct EventServer {
    name: String,
    version: String,
    tools: ToolRegistry,
    resources: ResourceService,
    closed: AtomicBool,
}

impl EventServer {
    /// Create a server around a session's tool registry and resource service.
    pub fn new(server: &ServerConfig, tools: ToolRegistry, resources: ResourceService) -> Self {
        Self {
            name: server.name.clone(),
            version: server.version.clone(),
            tools,
            resources,
            closed: AtomicBool::new(false),
        }
    }

    /// Answer a JSON-RPC request.
    #[instrument(skip_all, fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize(&request)),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": self.tools.list_tools() })),
            "tools/call" => self.call_tool(id, &request).await,
            "resources/list" => JsonRpcResponse::success(
                id,
                json!({ "resources": self.resources.list_resources() }),
            ),
            "resources/templates/list" => JsonRpcResponse::success(
                id,
                json!({ "resourceTemplates": self.resources.list_resource_templates() }),
            ),
            "resources/read" => self.read_resource(id, &request),
            method => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::method_not_found(id, method)
            }
        }
    }

    /// Accept a notification. Nothing is ever sent back.
    pub fn handle_notification(&self, notification: &JsonRpcRequest) {
        match notification.method.as_str() {
            "notifications/initialized" => debug!("Client finished initialization"),
            method => debug!("Ignoring notification: {}", method),
        }
    }

    fn initialize(&self, request: &JsonRpcRequest) -> Value {
        let requested = request.param("protocolVersion").and_then(Value::as_str);
        let version = negotiate_protocol_version(requested);
        info!("Initializing session (protocol {})", version);

        let capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build();

        json!({
            "protocolVersion": version,
            "capabilities": capabilities,
            "serverInfo": {
                "name": self.name,
                "version": self.version
            },
            "instructions": INSTRUCTIONS
        })
    }

    async fn call_tool(&self, id: Value, request: &JsonRpcRequest) -> JsonRpcResponse {
        let Some(name) = request.param("name").and_then(Value::as_str) else {
            return JsonRpcResponse::invalid_params(id, "Missing tool name");
        };

        let arguments = match request.param("arguments") {
            None | Some(Value::Null) => None,
            Some(Value::Object(arguments)) => Some(arguments.clone()),
            Some(_) => return JsonRpcResponse::invalid_params(id, "Tool arguments must be an object"),
        };

        match self.tools.call_tool(ToolInvocation::new(name, arguments)).await {
            Ok(result) => to_response(id, &result),
            Err(e) => JsonRpcResponse::invalid_params(id, e.to_string()),
        }
    }

    fn read_resource(&self, id: Value, request: &JsonRpcRequest) -> JsonRpcResponse {
        let Some(uri) = request.param("uri").and_then(Value::as_str) else {
            return JsonRpcResponse::invalid_params(id, "Missing resource URI");
        };

        match self.resources.read_resource(uri) {
            Ok(result) => to_response(id, &result),
            Err(e @ ResourceError::NotFound(_)) => {
                let mut response = JsonRpcResponse::error(id, RESOURCE_NOT_FOUND, e.to_string());
                if let Some(error) = response.error.as_mut() {
                    let mut data = JsonObject::new();
                    data.insert("uri".to_string(), json!(uri));
                    error.data = Some(Value::Object(data));
                }
                response
            }
            Err(e) => JsonRpcResponse::internal_error(id, e.to_string()),
        }
    }

    /// Tear the server down. Returns `true` only for the call that closed it.
    pub fn close(&self) -> bool {
        let first = !self.closed.swap(true, Ordering::SeqCst);
        if first {
            debug!("Server closed");
        }
        first
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

fn to_response<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::internal_error(id, e.to_string()),
    }
}
