//! Gated Explorer
//!
//! A terminal client for two public GraphQL datasets, behind a local
//! display-name / job-title gate:
//! - Identity persisted in per-profile local storage
//! - Cached GraphQL data client
//! - Paged tables with a detail overlay
//! - Stale responses discarded by request token

pub mod config;
pub mod graphql;
pub mod session;
pub mod tui;
pub mod utils;
pub mod views;

// Re-exports for convenience
pub use config::ExplorerConfig;
pub use graphql::DataClient;
pub use session::{Identity, SessionContext, SessionStore};
pub use views::{ListView, Route};
