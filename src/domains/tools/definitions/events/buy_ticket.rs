//! Ticket purchase link tool.
//!
//! No purchase is ever made here. The tool loads the event and tells the
//! agent which Eventbrite page to open.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, de};
use tracing::{error, info};

use super::common::{
    MISSING_EVENT_ID, display_name, event_url, fetch_event, normalize_event_id, widget_meta,
};
use crate::domains::eventbrite::EventGateway;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{EventPayload, ToolHandler, parse_arguments, reply_with_event};

const NO_URL: &str = "No Eventbrite URL was found for this event.";

/// Parameters for a ticket purchase link.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BuyTicketParams {
    /// Eventbrite event id.
    #[schemars(description = "Eventbrite event id")]
    pub id: String,

    /// Number of tickets (default: 1).
    #[schemars(description = "Number of tickets to buy (default: 1)")]
    #[serde(default = "default_quantity", deserialize_with = "whole_quantity")]
    pub quantity: NonZeroU32,
}

fn default_quantity() -> NonZeroU32 {
    NonZeroU32::MIN
}

/// Accept any positive whole number, including JSON floats such as `3.0`.
fn whole_quantity<'de, D>(deserializer: D) -> Result<NonZeroU32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let whole = number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
            .map(|f| f as u64)
    });

    whole
        .and_then(|n| u32::try_from(n).ok())
        .and_then(NonZeroU32::new)
        .ok_or_else(|| {
            de::Error::custom(format!(
                "quantity must be a positive whole number, got {}",
                number
            ))
        })
}

impl BuyTicketParams {
    /// The trimmed id, or `None` when it is blank.
    pub fn event_id(&self) -> Option<&str> {
        normalize_event_id(&self.id)
    }
}

/// Build the purchase instructions for an event.
pub fn purchase_message(quantity: NonZeroU32, name: &str, url: Option<&str>) -> String {
    let plural = if quantity.get() > 1 { "s" } else { "" };
    format!(
        "To buy {} ticket{} for \"{}\", open this link in your browser. {}",
        quantity,
        plural,
        name,
        url.unwrap_or(NO_URL)
    )
}

/// Ticket purchase link tool implementation.
pub struct BuyTicketTool {
    gateway: Arc<dyn EventGateway>,
}

impl BuyTicketTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "buyTicket";

    pub const TITLE: &'static str = "Buy ticket for an event";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Provides a ticket purchase link for an Eventbrite event. \
         This does not complete the purchase but returns the correct URL.";

    pub const INVOKING: &'static str = "Preparing ticket purchase link";
    pub const INVOKED: &'static str = "Provided ticket purchase link";

    pub fn new(gateway: Arc<dyn EventGateway>) -> Self {
        Self { gateway }
    }

    /// Execute the tool logic.
    pub async fn execute(&self, params: BuyTicketParams) -> CallToolResult {
        let Some(id) = params.event_id() else {
            return reply_with_event(MISSING_EVENT_ID, None);
        };

        info!("Preparing purchase link for {} ticket(s) of event {}", params.quantity, id);

        match fetch_event(self.gateway.as_ref(), id).await {
            Ok(event) => {
                let message =
                    purchase_message(params.quantity, display_name(&event, id), event_url(&event));
                reply_with_event(message, Some(event))
            }
            Err(e) => {
                error!("{} error for {}: {}", Self::NAME, id, e);
                reply_with_event(
                    format!(
                        "There was an error preparing the ticket purchase for event {}.",
                        id
                    ),
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
            input_schema: schema_for_type::<BuyTicketParams>().into(),
            output_schema: Some(schema_for_type::<EventPayload>().into()),
            annotations: None,
            icons: None,
            meta: Some(widget_meta(Self::INVOKING, Self::INVOKED)),
        }
    }
}

#[async_trait]
impl ToolHandler for BuyTicketTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Self::tool()
    }

    async fn call(&self, arguments: Option<JsonObject>) -> Result<CallToolResult, ToolError> {
        let params: BuyTicketParams = parse_arguments(Self::NAME, arguments)?;
        Ok(self.execute(params).await)
    }
}
