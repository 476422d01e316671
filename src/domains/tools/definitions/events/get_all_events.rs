//! Event listing tool.
//!
//! Lists the events of the configured Eventbrite organization, filtered by
//! status. A missing organization id is a soft misconfiguration: the tool
//! still answers, with an empty collection and an explanation.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::common::{extract_events, widget_meta};
use crate::domains::eventbrite::EventGateway;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{
    EventsPayload, ToolHandler, parse_arguments, reply_with_events,
};

/// Eventbrite event status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    All,
    #[default]
    Live,
    Draft,
    Started,
    Ended,
    Completed,
    Canceled,
}

impl EventStatus {
    /// Every accepted status value.
    pub const VALUES: [EventStatus; 7] = [
        Self::All,
        Self::Live,
        Self::Draft,
        Self::Started,
        Self::Ended,
        Self::Completed,
        Self::Canceled,
    ];

    /// Wire value sent to Eventbrite.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Live => "live",
            Self::Draft => "draft",
            Self::Started => "started",
            Self::Ended => "ended",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

/// Parameters for the event listing.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetAllEventsParams {
    /// Status filter (default: live).
    #[schemars(description = "Event status filter (default: live)")]
    #[serde(default)]
    pub status: EventStatus,
}

/// Event listing tool implementation.
pub struct GetAllEventsTool {
    gateway: Arc<dyn EventGateway>,
    organization_id: Option<String>,
}

impl GetAllEventsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getAllEvents";

    pub const TITLE: &'static str = "Get all events";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Fetches events from Eventbrite for the configured organization.";

    pub const INVOKING: &'static str = "Loading events from Eventbrite";
    pub const INVOKED: &'static str = "Loaded events from Eventbrite";

    pub const ORG_NOT_CONFIGURED: &'static str =
        "EVENTBRITE_ORG_ID is not configured on the server.";
    pub const NO_EVENTS: &'static str = "No events found for this organization.";
    pub const FETCH_FAILED: &'static str = "There was an error fetching events from Eventbrite.";

    pub fn new(gateway: Arc<dyn EventGateway>, organization_id: Option<String>) -> Self {
        Self {
            gateway,
            organization_id,
        }
    }

    /// Execute the tool logic.
    pub async fn execute(&self, params: GetAllEventsParams) -> CallToolResult {
        let Some(organization_id) = self.organization_id.as_deref() else {
            warn!("{} called without an organization id", Self::NAME);
            return reply_with_events(Self::ORG_NOT_CONFIGURED, Vec::new());
        };

        info!(
            "Listing {} events for organization {}",
            params.status.as_str(),
            organization_id
        );

        let path = format!("/organizations/{}/events/", organization_id);
        match self
            .gateway
            .call(&path, &[("status", Some(params.status.as_str()))])
            .await
        {
            Ok(data) => {
                let events = extract_events(data);
                if events.is_empty() {
                    return reply_with_events(Self::NO_EVENTS, Vec::new());
                }

                let message = format!("Found {} event(s) on Eventbrite.", events.len());
                reply_with_events(message, events)
            }
            Err(e) => {
                error!("{} error: {}", Self::NAME, e);
                reply_with_events(Self::FETCH_FAILED, Vec::new())
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            title: Some(Self::TITLE.to_string()),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GetAllEventsParams>().into(),
            output_schema: Some(schema_for_type::<EventsPayload>().into()),
            annotations: None,
            icons: None,
            meta: Some(widget_meta(Self::INVOKING, Self::INVOKED)),
        }
    }
}

#[async_trait]
impl ToolHandler for GetAllEventsTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Self::tool()
    }

    async fn call(&self, arguments: Option<JsonObject>) -> Result<CallToolResult, ToolError> {
        let params: GetAllEventsParams = parse_arguments(Self::NAME, arguments)?;
        Ok(self.execute(params).await)
    }
}
