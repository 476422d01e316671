//! Configuration management for the MCP server.
//!
//! Configuration is read once at startup and is immutable afterwards. It is
//! shared as `Arc<Config>` and passed explicitly to the components that need
//! it; handlers never read the environment themselves.

use super::transport::HttpConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Default Eventbrite REST API base URL.
pub const DEFAULT_EVENTBRITE_API_BASE: &str = "https://www.eventbriteapi.com/v3";

/// Placeholder values shipped in sample configuration. They count as unset.
const PLACEHOLDER_VALUES: &[&str] = &["YOUR_TOKEN_HERE", "YOUR_ORG_ID_HERE"];

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    pub http: HttpConfig,

    /// Eventbrite API access.
    pub eventbrite: EventbriteConfig,

    /// Widget resource configuration.
    pub widget: WidgetConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for the Eventbrite API.
#[derive(Clone, Serialize, Deserialize)]
pub struct EventbriteConfig {
    /// Base URL of the REST API, without trailing path segments for endpoints.
    pub api_base: String,

    /// Private bearer token. Without it every tool reports a configuration error.
    pub token: Option<String>,

    /// Organization whose events are listed. Without it only listing degrades.
    pub organization_id: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for EventbriteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventbriteConfig")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

/// Configuration for the widget resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Path of the HTML document served as the widget.
    pub path: PathBuf,
}

impl Default for EventbriteConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_EVENTBRITE_API_BASE.to_string(),
            token: None,
            organization_id: None,
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/event-widget.html"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "event-planner-app".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            http: HttpConfig::default(),
            eventbrite: EventbriteConfig::default(),
            widget: WidgetConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and a `.env` file if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = lookup("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.http = HttpConfig::from_vars(&lookup);

        if let Some(api_base) = configured(lookup("EVENTBRITE_API_BASE")) {
            config.eventbrite.api_base = api_base;
        }
        config.eventbrite.token = configured(lookup("EVENTBRITE_TOKEN"));
        config.eventbrite.organization_id = configured(lookup("EVENTBRITE_ORG_ID"));

        if let Some(path) = configured(lookup("MCP_WIDGET_PATH")) {
            config.widget.path = PathBuf::from(path);
        }

        config
    }

    /// Log what is missing from the Eventbrite configuration.
    pub fn log_warnings(&self) {
        if self.eventbrite.token.is_none() {
            warn!("EVENTBRITE_TOKEN is not set. Event tools will fail.");
        } else {
            info!("Eventbrite token loaded from environment");
        }

        if self.eventbrite.organization_id.is_none() {
            warn!("EVENTBRITE_ORG_ID is not set. getAllEvents will return no events.");
        }
    }
}

/// Normalise an optional setting: blank values and placeholders are unset.
fn configured(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !PLACEHOLDER_VALUES.contains(&v.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.server.name, "event-planner-app");
        assert_eq!(config.eventbrite.api_base, DEFAULT_EVENTBRITE_API_BASE);
        assert!(config.eventbrite.token.is_none());
        assert!(config.eventbrite.organization_id.is_none());
        assert_eq!(config.http.port, 8787);
        assert_eq!(config.http.rpc_path, "/mcp");
    }

    #[test]
    fn test_credentials_from_vars() {
        let config = config_from(&[
            ("EVENTBRITE_TOKEN", "test_token_12345"),
            ("EVENTBRITE_ORG_ID", " 987 "),
            ("EVENTBRITE_API_BASE", "http://localhost:9000/v3"),
        ]);
        assert_eq!(config.eventbrite.token.as_deref(), Some("test_token_12345"));
        assert_eq!(config.eventbrite.organization_id.as_deref(), Some("987"));
        assert_eq!(config.eventbrite.api_base, "http://localhost:9000/v3");
    }

    #[test]
    fn test_placeholders_count_as_unset() {
        let config = config_from(&[
            ("EVENTBRITE_TOKEN", "YOUR_TOKEN_HERE"),
            ("EVENTBRITE_ORG_ID", "YOUR_ORG_ID_HERE"),
        ]);
        assert!(config.eventbrite.token.is_none());
        assert!(config.eventbrite.organization_id.is_none());
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config_from(&[("EVENTBRITE_TOKEN", "   "), ("EVENTBRITE_ORG_ID", "")]);
        assert!(config.eventbrite.token.is_none());
        assert!(config.eventbrite.organization_id.is_none());
    }

    #[test]
    fn test_widget_path_override() {
        let config = config_from(&[("MCP_WIDGET_PATH", "/srv/widget.html")]);
        assert_eq!(config.widget.path, PathBuf::from("/srv/widget.html"));
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let eventbrite = EventbriteConfig {
            token: Some("super_secret_key".to_string()),
            ..Default::default()
        };
        let debug_str = format!("{:?}", eventbrite);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }
}
