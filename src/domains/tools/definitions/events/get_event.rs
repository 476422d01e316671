//! Single event lookup tool.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info};

use super::common::{MISSING_EVENT_ID, display_name, fetch_event, normalize_event_id, widget_meta};
use crate::domains::eventbrite::EventGateway;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{EventPayload, ToolHandler, parse_arguments, reply_with_event};

/// Parameters for an event lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetEventParams {
    /// Eventbrite event id.
    #[schemars(description = "Eventbrite event id")]
    pub id: String,
}

impl GetEventParams {
    /// The trimmed id, or `None` when it is blank.
    pub fn event_id(&self) -> Option<&str> {
        normalize_event_id(&self.id)
    }
}

/// Event lookup tool implementation.
pub struct GetEventTool {
    gateway: Arc<dyn EventGateway>,
}

impl GetEventTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getEvent";

    pub const TITLE: &'static str = "Get event by id";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetches a single Eventbrite event by id.";

    pub const INVOKING: &'static str = "Loading event details from Eventbrite";
    pub const INVOKED: &'static str = "Loaded event details from Eventbrite";

    pub fn new(gateway: Arc<dyn EventGateway>) -> Self {
        Self { gateway }
    }

    /// Execute the tool logic.
    pub async fn execute(&self, params: GetEventParams) -> CallToolResult {
        let Some(id) = params.event_id() else {
            return reply_with_event(MISSING_EVENT_ID, None);
        };

        info!("Loading event {}", id);

        match fetch_event(self.gateway.as_ref(), id).await {
            Ok(event) => {
                let message = format!("Loaded event \"{}\".", display_name(&event, id));
                reply_with_event(message, Some(event))
            }
            Err(e) => {
                error!("{} error for {}: {}", Self::NAME, id, e);
                reply_with_event(
                    format!("There was an error fetching event {} from Eventbrite.", id),
                    None,
                )
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            title: Some(Self::TITLE.to_string()),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GetEventParams>().into(),
            output_schema: Some(schema_for_type::<EventPayload>().into()),
            annotations: None,
            icons: None,
            meta: Some(widget_meta(Self::INVOKING, Self::INVOKED)),
        }
    }
}

#[async_trait]
impl ToolHandler for GetEventTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Self::tool()
    }

    async fn call(&self, arguments: Option<JsonObject>) -> Result<CallToolResult, ToolError> {
        let params: GetEventParams = parse_arguments(Self::NAME, arguments)?;
        Ok(self.execute(params).await)
    }
}
