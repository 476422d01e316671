//! Per-request sessions.
//!
//! Every request on the protocol endpoint gets its own [`Session`]: a fresh
//! [`EventServer`] with its own tool registry and resource binding, connected
//! to a fresh [`StatelessHttpTransport`]. The only things shared between
//! sessions are the read-only configuration, the gateway and the widget text.
//!
//! A session is torn down exactly once. Dropping it tears it down too, so a
//! request future dropped on client disconnect still releases its session.

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response};
use tracing::debug;

use super::config::Config;
use super::server::EventServer;
use super::transport::{StatelessHttpTransport, TransportResult};
use crate::domains::eventbrite::EventGateway;
use crate::domains::resources::{ResourceService, WidgetDocument};
use crate::domains::tools::ToolRegistry;

/// Callback invoked after a session has been torn down.
pub type TeardownHook = Arc<dyn Fn() + Send + Sync>;

/// Builds a new server/transport pair for every request.
pub struct SessionFactory {
    config: Arc<Config>,
    gateway: Arc<dyn EventGateway>,
    widget: WidgetDocument,
    on_teardown: Option<TeardownHook>,
}

impl SessionFactory {
    pub fn new(config: Arc<Config>, gateway: Arc<dyn EventGateway>, widget: WidgetDocument) -> Self {
        Self {
            config,
            gateway,
            widget,
            on_teardown: None,
        }
    }

    /// Observe every session teardown.
    pub fn with_teardown_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_teardown = Some(Arc::new(hook));
        self
    }

    /// Build an unconnected server/transport pair. The caller owns both.
    pub fn create(&self) -> (EventServer, StatelessHttpTransport) {
        let tools = ToolRegistry::new(&self.config, self.gateway.clone());
        let resources = ResourceService::new(self.widget.clone());
        let server = EventServer::new(&self.config.server, tools, resources);
        (server, StatelessHttpTransport::new())
    }

    /// Create and connect a new session.
    pub fn open(&self) -> TransportResult<Session> {
        let (server, transport) = self.create();
        let mut session = Session::open(server, transport)?;
        session.on_teardown = self.on_teardown.clone();
        Ok(session)
    }
}

/// One connected server/transport pair, alive for a single request.
pub struct Session {
    server: Arc<EventServer>,
    transport: StatelessHttpTransport,
    on_teardown: Option<TeardownHook>,
    closed: bool,
}

impl Session {
    /// Connect `transport` to `server`.
    pub fn open(server: EventServer, mut transport: StatelessHttpTransport) -> TransportResult<Self> {
        let server = Arc::new(server);
        transport.connect(server.clone())?;
        Ok(Self {
            server,
            transport,
            on_teardown: None,
            closed: false,
        })
    }

    /// Serve the request through this session's transport.
    pub async fn handle(&self, request: Request<Body>) -> TransportResult<Response> {
        self.transport.handle_request(request).await
    }

    /// Tear down the transport, then the server. Only the first call has an effect.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.transport.close();
        self.server.close();
        debug!("Session torn down");

        if let Some(hook) = &self.on_teardown {
            hook();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
