//! Views Module
//!
//! Render-agnostic screen state: the gate form, the generic paged list with
//! its detail overlay, and the address that selects between them.

pub mod gate;
pub mod list;
pub mod route;
mod screen;

pub use gate::{GateField, GateState, GateView, ValidationError};
pub use list::{DetailOverlay, DetailTicket, ListDisplay, ListTicket, ListView, Slot};
pub use route::{parse_page, DatasetKind, Route};
pub use screen::Screen;
