//! Tool handler contract and response shaping.
//!
//! Every tool answers with the same envelope: an optional text message for the
//! agent plus a structured payload the widget renders. The payload is always
//! present and always has the documented shape, also on failure.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, JsonObject, RawContent, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::error::ToolError;

/// A decoded `tools/call` request, consumed by exactly one handler.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// The name of the tool to execute.
    pub name: String,

    /// The arguments to pass to the tool.
    pub arguments: Option<JsonObject>,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: Option<JsonObject>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Structured payload of tools that return a collection of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventsPayload {
    /// Events as returned by Eventbrite.
    pub events: Vec<Value>,
}

/// Structured payload of tools that return a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventPayload {
    /// The event as returned by Eventbrite, or null when none was loaded.
    pub event: Option<Value>,
}

/// Trait implemented by every tool bound into a [`super::ToolRegistry`].
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &'static str;

    /// Tool metadata advertised on `tools/list`.
    fn to_tool(&self) -> Tool;

    /// Decode the arguments and run the tool.
    ///
    /// Only argument decoding can fail; execution itself always yields a result.
    async fn call(&self, arguments: Option<JsonObject>) -> Result<CallToolResult, ToolError>;
}

/// Decode raw tool arguments into a validated parameter struct.
pub fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: Option<JsonObject>,
) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments.unwrap_or_default()))
        .map_err(|e| ToolError::invalid_arguments(tool, e.to_string()))
}

/// Reply carrying a collection of events.
pub fn reply_with_events(message: impl Into<String>, events: Vec<Value>) -> CallToolResult {
    structured_reply(message.into(), json!({ "events": events }))
}

/// Reply carrying a single event, or null.
pub fn reply_with_event(message: impl Into<String>, event: Option<Value>) -> CallToolResult {
    structured_reply(message.into(), json!({ "event": event }))
}

fn structured_reply(message: String, payload: Value) -> CallToolResult {
    let content = if message.is_empty() {
        Vec::new()
    } else {
        vec![Content::text(message)]
    };

    let mut result = CallToolResult::success(content);
    result.structured_content = Some(payload);
    result
}

/// First text segment of a result, if any.
pub fn result_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .first()
        .and_then(|content| match &content.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
}
