//! In-memory gateway used by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::client::{EventGateway, Query};
use super::error::{GatewayError, GatewayResult};

/// One call observed by a [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub path: String,
    pub query: Vec<(String, Option<String>)>,
}

enum Behaviour {
    Respond(Value),
    Fail,
    Pending,
}

/// Gateway that records every call and answers with a canned behaviour.
pub struct RecordingGateway {
    behaviour: Behaviour,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingGateway {
    fn with(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Answer every call with `body`.
    pub fn responding(body: Value) -> Arc<Self> {
        Self::with(Behaviour::Respond(body))
    }

    /// Fail every call with a 500 upstream error.
    pub fn failing() -> Arc<Self> {
        Self::with(Behaviour::Fail)
    }

    /// Never complete a call.
    pub fn pending() -> Arc<Self> {
        Self::with(Behaviour::Pending)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EventGateway for RecordingGateway {
    async fn call(&self, path: &str, query: &Query<'_>) -> GatewayResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
        });

        match &self.behaviour {
            Behaviour::Respond(body) => Ok(body.clone()),
            Behaviour::Fail => Err(GatewayError::upstream(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                "boom",
            )),
            Behaviour::Pending => futures::future::pending().await,
        }
    }
}
