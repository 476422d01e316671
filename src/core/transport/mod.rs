//! Transport layer for the MCP server.
//!
//! - **HTTP front door** (`http`): the network listener routing preflight,
//!   health and protocol traffic.
//! - **Stateless transport** (`stateless`): answers the JSON-RPC messages of
//!   one HTTP request on behalf of one session's server.
//!
//! The JSON-RPC message types shared by both live in `jsonrpc`.

mod config;
mod error;
pub mod http;
pub mod jsonrpc;
pub mod stateless;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use self::http::HttpTransport;
pub use stateless::StatelessHttpTransport;
