//! Event Planner MCP Server Library
//!
//! A stateless Model Context Protocol (MCP) server exposing Eventbrite events
//! to LLM-driven clients: list an organization's events, load one event and
//! get the link where tickets can be bought.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the per-session protocol server,
//!   the session factory and the HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **eventbrite**: authenticated calls to the Eventbrite REST API
//!   - **tools**: `getAllEvents`, `getEvent` and `buyTicket`
//!   - **resources**: the HTML widget that renders tool output
//!
//! Every HTTP request on the protocol endpoint gets a brand new server and
//! transport, which are torn down once the request is over.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use event_planner_mcp_server::core::{Config, HttpTransport, SessionFactory};
//! use event_planner_mcp_server::domains::eventbrite::EventbriteClient;
//! use event_planner_mcp_server::domains::resources::WidgetDocument;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let widget = WidgetDocument::load(&config.widget.path).await?;
//!     let gateway = Arc::new(EventbriteClient::new(&config.eventbrite));
//!     let transport = HttpTransport::new(config.http.clone());
//!     let factory = SessionFactory::new(Arc::new(config), gateway, widget);
//!     transport.run(factory).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, EventServer, Result, SessionFactory};
