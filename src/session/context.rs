//! Session Context
//!
//! Process-wide holder of the current identity. Built once when the client
//! mounts, shared by cheap clones, and kept in sync with the Session Store
//! on every mutation.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::identity::Identity;
use super::store::SessionStore;

#[derive(Clone)]
pub struct SessionContext {
    current: Arc<watch::Sender<Option<Identity>>>,
    store: SessionStore,
}

impl SessionContext {
    /// Initializes the context from whatever the store holds.
    pub fn mount(store: SessionStore) -> Self {
        let initial = store.load();
        info!(
            "Session mounted ({})",
            if initial.is_some() { "identity present" } else { "no identity" }
        );
        let (tx, _rx) = watch::channel(initial);
        Self {
            current: Arc::new(tx),
            store,
        }
    }

    /// Tears this handle down. Storage is left as is; other handles stay valid.
    pub fn unmount(self) {
        debug!("Session context handle unmounted");
    }

    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    pub fn is_present(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }

    /// Creates the identity. Empty fields are ignored; callers validate first.
    pub fn sign_in(&self, display_name: &str, title: &str) {
        let Some(identity) = Identity::new(display_name, title) else {
            debug!("sign_in ignored: empty field");
            return;
        };
        info!("Signed in as {} ({})", identity.display_name, identity.title);
        self.replace(identity);
    }

    /// Replaces the existing identity wholesale.
    pub fn update(&self, identity: Identity) {
        if !identity.is_valid() {
            debug!("update ignored: empty field");
            return;
        }
        info!("Identity updated to {} ({})", identity.display_name, identity.title);
        self.replace(identity);
    }

    pub fn sign_out(&self) {
        info!("Signed out");
        self.current.send_replace(None);
        self.store.clear();
    }

    fn replace(&self, identity: Identity) {
        self.store.save(&identity);
        self.current.send_replace(Some(identity));
    }
}
