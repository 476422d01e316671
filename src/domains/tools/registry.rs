//! Tool Registry - registration and dispatch for all tools.
//!
//! A registry is built for every session. It owns its tool instances; the
//! only things shared with other sessions are the read-only configuration and
//! the gateway.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Tool};
use tracing::{info, warn};

use super::definitions::{BuyTicketTool, GetAllEventsTool, GetEventTool};
use super::error::ToolError;
use super::handlers::{ToolHandler, ToolInvocation};
use crate::core::config::Config;
use crate::domains::eventbrite::EventGateway;

/// Tool registry - holds the tools bound to one session.
pub struct ToolRegistry {
    tools: Vec<Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a registry with the event tools bound to `gateway`.
    pub fn new(config: &Config, gateway: Arc<dyn EventGateway>) -> Self {
        Self {
            tools: vec![
                Box::new(GetAllEventsTool::new(
                    gateway.clone(),
                    config.eventbrite.organization_id.clone(),
                )),
                Box::new(GetEventTool::new(gateway.clone())),
                Box::new(BuyTicketTool::new(gateway)),
            ],
        }
    }

    /// Create an empty registry.
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Names are unique within a registry.
    pub fn register(&mut self, tool: Box<dyn ToolHandler>) -> Result<(), ToolError> {
        if self.get(tool.name()).is_some() {
            return Err(ToolError::AlreadyRegistered(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    fn get(&self, name: &str) -> Option<&dyn ToolHandler> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.to_tool()).collect()
    }

    /// Dispatch a tool call to the bound handler.
    pub async fn call_tool(&self, invocation: ToolInvocation) -> Result<CallToolResult, ToolError> {
        let Some(tool) = self.get(&invocation.name) else {
            warn!("Unknown tool requested: {}", invocation.name);
            return Err(ToolError::not_found(invocation.name));
        };

        info!("Calling tool: {}", invocation.name);
        tool.call(invocation.arguments).await
    }
}
