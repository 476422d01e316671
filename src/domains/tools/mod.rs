//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are the operations an agent can call: list events, load one event,
//! and get a ticket purchase link.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - `ToolHandler` trait and the shared response envelope
//! - `registry.rs` - Per-session tool registry and dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with params, `execute()` and a
//!    `ToolHandler` implementation
//! 2. Export it in `definitions/mod.rs`
//! 3. Bind it in `ToolRegistry::new`

pub mod definitions;
mod error;
mod handlers;
mod registry;

pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
