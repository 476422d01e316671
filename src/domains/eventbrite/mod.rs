//! Eventbrite domain module.
//!
//! This module is the External API Gateway: the only place that talks to the
//! ticketing provider. Tools depend on the [`EventGateway`] trait rather than
//! on the concrete HTTP client so they can be exercised without a network.
//!
//! ## Architecture
//!
//! - `client.rs` - `EventbriteClient`, the reqwest-backed gateway
//! - `error.rs` - Gateway failure taxonomy

mod client;
mod error;

#[cfg(test)]
pub mod testing;

pub use client::{EventGateway, EventbriteClient, Query, build_url};
pub use error::{GatewayError, GatewayResult};
