//! Domains module containing business logic organized by bounded contexts.
//!
//! - `eventbrite`: the gateway to the Eventbrite REST API
//! - `tools`: the event tools exposed to MCP clients
//! - `resources`: the widget document rendering tool output

pub mod eventbrite;
pub mod resources;
pub mod tools;
