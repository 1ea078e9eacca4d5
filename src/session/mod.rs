//! Session Module
//!
//! Local identity gate: durable storage, the store that guards it, and the
//! shared context every screen reads from.

mod context;
mod identity;
mod storage;
mod store;

pub use context::SessionContext;
pub use identity::Identity;
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
pub use store::{SessionStore, IDENTITY_KEY};
