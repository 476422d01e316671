//! Resources domain module.
//!
//! Resources are documents clients can read. This server has exactly one:
//! the HTML widget that renders the structured output of the event tools.
//!
//! ## Architecture
//!
//! - `definitions/` - Resource definitions (URI, name, MIME type)
//! - `widget.rs` - The widget document, read from disk once at startup
//! - `service.rs` - Resource service for listing and reading

pub mod definitions;
mod error;
mod service;
mod widget;

pub use definitions::{EventWidgetResource, ResourceDefinition, WIDGET_URI};
pub use error::ResourceError;
pub use service::ResourceService;
pub use widget::WidgetDocument;
