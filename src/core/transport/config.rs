//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path of the protocol endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rpc_path() -> String {
    "/mcp".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            rpc_path: default_rpc_path(),
        }
    }
}

impl HttpConfig {
    /// Create an HTTP config for the given port and host.
    pub fn new(port: u16, host: impl Into<String>) -> Self {
        Self {
            port,
            host: host.into(),
            ..Default::default()
        }
    }

    /// Load HTTP config from environment-style variables.
    ///
    /// `MCP_HTTP_PORT` takes precedence over the conventional `PORT`.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("MCP_HTTP_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or_else(default_port);
        let host = lookup("MCP_HTTP_HOST").unwrap_or_else(default_host);
        let rpc_path = lookup("MCP_HTTP_PATH")
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(default_rpc_path);

        Self {
            port,
            host,
            rpc_path,
        }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get a description of this listener for logging.
    pub fn description(&self) -> String {
        format!("HTTP on {}{}", self.address(), self.rpc_path)
    }
}
