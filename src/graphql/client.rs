//! GraphQL Data Client
//!
//! A thin GraphQL-over-HTTP client bound to one public endpoint. The public
//! datasets need no credentials, so the client carries none.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::cache::ResponseCache;

/// Why a query produced no usable data. Messages are shown to the user as is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server responded with HTTP {0}")]
    Status(u16),
    #[error("Query failed: {0}")]
    GraphQL(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("No record found for id {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Network(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Serve from the response cache when possible.
    #[default]
    CacheFirst,
    /// Always hit the network, refreshing the cache.
    NetworkOnly,
}

/// One query document plus its variables.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: &'static str,
    pub variables: Value,
    #[serde(skip)]
    pub policy: FetchPolicy,
}

impl GraphQLRequest {
    pub fn new(query: &'static str, variables: Value) -> Self {
        Self {
            query,
            variables,
            policy: FetchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQLErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorEntry {
    message: String,
}

/// Executes a request and returns the `data` member of the response.
#[async_trait]
pub trait GraphQLTransport: Send + Sync {
    fn endpoint(&self) -> &str;
    async fn execute(&self, request: &GraphQLRequest) -> Result<Value, FetchError>;
}

pub struct ReqwestTransport {
    client: Client,
    endpoint: String,
}

impl ReqwestTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("gated_explorer/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl GraphQLTransport for ReqwestTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute(&self, request: &GraphQLRequest) -> Result<Value, FetchError> {
        debug!("POST {} variables={}", self.endpoint, request.variables);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body: GraphQLResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        into_data(body)
    }
}

fn into_data(body: GraphQLResponse) -> Result<Value, FetchError> {
    if !body.errors.is_empty() {
        let messages: Vec<_> = body.errors.into_iter().map(|e| e.message).collect();
        return Err(FetchError::GraphQL(messages.join("; ")));
    }
    match body.data {
        Some(Value::Null) | None => Err(FetchError::Decode("response carried no data".into())),
        Some(data) => Ok(data),
    }
}

/// The configured client a screen queries through: one endpoint plus its
/// response cache.
#[derive(Clone)]
pub struct DataClient {
    transport: Arc<dyn GraphQLTransport>,
    cache: Arc<ResponseCache>,
}

impl DataClient {
    pub fn new(transport: Arc<dyn GraphQLTransport>) -> Self {
        Self {
            transport,
            cache: Arc::new(ResponseCache::new()),
        }
    }

    pub fn connect(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self::new(Arc::new(ReqwestTransport::new(endpoint, timeout)))
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub async fn query(&self, request: &GraphQLRequest) -> Result<Value, FetchError> {
        let endpoint = self.transport.endpoint();
        if request.policy == FetchPolicy::CacheFirst {
            if let Some(hit) = self.cache.get(endpoint, request).await {
                debug!("Response cache hit for {}", endpoint);
                return Ok(hit);
            }
        }

        match self.transport.execute(request).await {
            Ok(data) => {
                self.cache.set(endpoint, request, data.clone()).await;
                Ok(data)
            }
            Err(e) => {
                warn!("Query against {} failed: {}", endpoint, e);
                Err(e)
            }
        }
    }

    /// Starts a fresh, empty response cache. Clones made before the call
    /// (in-flight fetches) keep writing to the old one, which nothing reads
    /// any more.
    pub fn reset_cache(&mut self) {
        self.cache = Arc::new(ResponseCache::new());
    }
}
