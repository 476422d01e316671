//! Tool definitions module.
//!
//! Each tool is defined in its own file for better maintainability.

pub mod events;

pub use events::{
    BuyTicketParams, BuyTicketTool, EventStatus, GetAllEventsParams, GetAllEventsTool,
    GetEventParams, GetEventTool,
};
