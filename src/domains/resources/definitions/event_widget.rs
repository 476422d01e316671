//! Events widget resource definition.

use rmcp::model::{JsonObject, Meta};
use serde_json::json;

use super::ResourceDefinition;

/// URI under which the widget is served and referenced by tool output templates.
pub const WIDGET_URI: &str = "ui://widget/events.html";

/// HTML widget rendering event tool output.
pub struct EventWidgetResource;

impl ResourceDefinition for EventWidgetResource {
    const URI: &'static str = WIDGET_URI;
    const NAME: &'static str = "event-widget";
    const DESCRIPTION: &'static str = "Widget rendering Eventbrite events returned by the event tools";
    const MIME_TYPE: &'static str = "text/html+skybridge";
}

impl EventWidgetResource {
    /// `_meta` attached to the widget contents.
    pub fn meta() -> Meta {
        let mut meta = JsonObject::new();
        meta.insert("openai/widgetPrefersBorder".to_string(), json!(true));
        Meta(meta)
    }
}
