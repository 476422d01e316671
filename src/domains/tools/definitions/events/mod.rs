//! Eventbrite event tools.
//!
//! - `get_all_events`: list the organization's events by status
//! - `get_event`: load one event by id
//! - `buy_ticket`: build a purchase link for an event

pub mod buy_ticket;
pub mod common;
pub mod get_all_events;
pub mod get_event;

pub use buy_ticket::{BuyTicketParams, BuyTicketTool};
pub use get_all_events::{EventStatus, GetAllEventsParams, GetAllEventsTool};
pub use get_event::{GetEventParams, GetEventTool};
