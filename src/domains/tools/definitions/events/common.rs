//! Helpers shared by the event tools.
//!
//! Eventbrite records are relayed untouched, so every accessor here reads
//! them defensively and falls back instead of failing.

use rmcp::model::{JsonObject, Meta};
use serde_json::{Value, json};

use crate::domains::eventbrite::{EventGateway, GatewayError, GatewayResult};
use crate::domains::resources::WIDGET_URI;

/// Message returned when the id argument is empty after trimming.
pub const MISSING_EVENT_ID: &str = "Missing event id.";

/// Build the `_meta` block linking a tool to the events widget.
pub fn widget_meta(invoking: &str, invoked: &str) -> Meta {
    let mut meta = JsonObject::new();
    meta.insert("openai/outputTemplate".to_string(), json!(WIDGET_URI));
    meta.insert("openai/toolInvocation/invoking".to_string(), json!(invoking));
    meta.insert("openai/toolInvocation/invoked".to_string(), json!(invoked));
    Meta(meta)
}

/// Trim an id argument; blank ids count as absent.
pub fn normalize_event_id(id: &str) -> Option<&str> {
    let id = id.trim();
    (!id.is_empty()).then_some(id)
}

/// Whether `id` can stand as one path segment without encoding.
///
/// Only URL-unreserved characters are allowed, and the dot segments are not.
pub fn is_path_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}

/// Fetch a single event by id. Ids that are not a single path segment never
/// reach the gateway.
pub async fn fetch_event(gateway: &dyn EventGateway, id: &str) -> GatewayResult<Value> {
    if !is_path_safe_id(id) {
        return Err(GatewayError::InvalidUrl(format!(
            "event id {:?} is not a single path segment",
            id
        )));
    }
    gateway.call(&format!("/events/{}/", id), &[]).await
}

/// Display name of an event (`name.text`), falling back to the given id.
pub fn display_name<'a>(event: &'a Value, fallback: &'a str) -> &'a str {
    event
        .pointer("/name/text")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
}

/// Public Eventbrite page of an event, if it has one.
pub fn event_url(event: &Value) -> Option<&str> {
    event
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}

/// Pull the `events` array out of a listing response.
pub fn extract_events(data: Value) -> Vec<Value> {
    match data {
        Value::Object(mut body) => match body.remove("events") {
            Some(Value::Array(events)) => events,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
