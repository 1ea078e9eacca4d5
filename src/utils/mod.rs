//! Utils Module
pub mod logging;
pub mod truncate;

pub use truncate::truncate_text;
