//! Session Store
//!
//! Durable owner of the single optional identity record. Every operation
//! degrades to a no-op when no storage is attached (headless rendering).

use std::sync::Arc;

use tracing::{debug, warn};

use super::identity::Identity;
use super::storage::LocalStorage;

/// The one storage key the identity lives under.
pub const IDENTITY_KEY: &str = "gate.identity";

#[derive(Clone)]
pub struct SessionStore {
    storage: Option<Arc<dyn LocalStorage>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// A store with no storage behind it: `load` is always `None` and writes
    /// are dropped.
    pub fn detached() -> Self {
        Self { storage: None }
    }

    pub fn is_attached(&self) -> bool {
        self.storage.is_some()
    }

    /// Reads the stored identity. Anything that is not a valid identity is
    /// purged and reported as absent.
    pub fn load(&self) -> Option<Identity> {
        let storage = self.storage.as_ref()?;

        let raw = match storage.get_item(IDENTITY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Identity storage unreadable, treating as signed out: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) if identity.is_valid() => {
                debug!("Loaded stored identity for {}", identity.display_name);
                Some(identity)
            }
            Ok(_) => {
                warn!("Stored identity has empty fields, purging");
                self.purge(storage.as_ref());
                None
            }
            Err(e) => {
                warn!("Stored identity is corrupt ({}), purging", e);
                self.purge(storage.as_ref());
                None
            }
        }
    }

    /// Writes the identity, replacing whatever was stored.
    pub fn save(&self, identity: &Identity) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        let json = match serde_json::to_string(identity) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize identity: {}", e);
                return;
            }
        };
        if let Err(e) = storage.set_item(IDENTITY_KEY, &json) {
            warn!("Failed to persist identity: {}", e);
        }
    }

    pub fn clear(&self) {
        if let Some(storage) = self.storage.as_ref() {
            self.purge(storage.as_ref());
        }
    }

    fn purge(&self, storage: &dyn LocalStorage) {
        if let Err(e) = storage.remove_item(IDENTITY_KEY) {
            warn!("Failed to remove stored identity: {}", e);
        }
    }
}
