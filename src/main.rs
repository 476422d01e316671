//! Event Planner MCP Server Entry Point
//!
//! Loads configuration, initializes logging, reads the widget and serves the
//! protocol endpoint over HTTP until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use event_planner_mcp_server::core::{Config, HttpTransport, SessionFactory};
use event_planner_mcp_server::domains::eventbrite::EventbriteClient;
use event_planner_mcp_server::domains::resources::WidgetDocument;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    config.log_warnings();

    let widget = WidgetDocument::load(&config.widget.path)
        .await
        .context("widget document is required")?;
    let gateway = Arc::new(EventbriteClient::new(&config.eventbrite));

    info!("Serving {}", config.http.description());
    let transport = HttpTransport::new(config.http.clone());
    let factory = SessionFactory::new(Arc::new(config), gateway, widget);
    transport.run(factory).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
