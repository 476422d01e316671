//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the per-session protocol server,
//! the session factory and the transport layer.

pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::EventServer;
pub use session::{Session, SessionFactory};
pub use transport::{HttpConfig, HttpTransport};
