//! Response Cache
//!
//! In-memory cache of query results keyed by endpoint, document and
//! variables, so revisiting a page does not refetch it.

use std::collections::{HashMap, VecDeque};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::client::GraphQLRequest;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    endpoint: String,
    document_hash: [u8; 32],
    variables_hash: [u8; 32],
}

impl CacheKey {
    fn new(endpoint: &str, request: &GraphQLRequest) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            document_hash: hash(request.query),
            // serde_json maps are ordered, so equal variables print identically
            variables_hash: hash(&request.variables.to_string()),
        }
    }
}

fn hash(text: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.finalize().into()
}

/// Entries kept before the oldest response is evicted.
pub const DEFAULT_CAPACITY: usize = 128;

#[derive(Default)]
struct Entries {
    responses: HashMap<CacheKey, Value>,
    /// Insertion order, oldest first.
    order: VecDeque<CacheKey>,
}

pub struct ResponseCache {
    entries: RwLock<Entries>,
    capacity: usize,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            capacity: capacity.max(1),
        }
    }

    pub async fn get(&self, endpoint: &str, request: &GraphQLRequest) -> Option<Value> {
        let key = CacheKey::new(endpoint, request);
        self.entries.read().await.responses.get(&key).cloned()
    }

    pub async fn set(&self, endpoint: &str, request: &GraphQLRequest, data: Value) {
        let key = CacheKey::new(endpoint, request);
        let mut entries = self.entries.write().await;
        if entries.responses.insert(key.clone(), data).is_some() {
            return;
        }
        entries.order.push_back(key);
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.responses.remove(&oldest);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.responses.len()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
