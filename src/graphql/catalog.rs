//! Query Catalog
//!
//! Each public dataset pairs a paginated list query with a fetch-by-id query
//! and knows how to read both responses. Screens stay generic over this
//! trait.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::client::{DataClient, FetchError, FetchPolicy, GraphQLRequest};

/// One page of list results. Never merged with another page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    /// `None` when the upstream reports no total.
    pub total_pages: Option<u32>,
}

impl<T> ListPage<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub trait Dataset: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Detail: Clone + Send + Sync + 'static;

    /// Human-readable name, used for headings and logs.
    fn title(&self) -> &'static str;

    fn list_request(&self, page: u32) -> GraphQLRequest;
    fn read_list(&self, page: u32, data: Value) -> Result<ListPage<Self::Item>, FetchError>;

    fn detail_request(&self, id: &str) -> GraphQLRequest;
    fn read_detail(&self, id: &str, data: Value) -> Result<Self::Detail, FetchError>;

    fn item_id<'a>(&self, item: &'a Self::Item) -> &'a str;

    /// Table header and one row per item, in the same column order.
    fn columns(&self) -> &'static [&'static str];
    fn row(&self, item: &Self::Item) -> Vec<String>;

    /// Heading and labelled lines for the detail overlay.
    fn detail_heading(&self, detail: &Self::Detail) -> String;
    fn detail_fields(&self, detail: &Self::Detail) -> Vec<(&'static str, String)>;
}

pub async fn fetch_page<D: Dataset>(
    client: &DataClient,
    dataset: &D,
    page: u32,
    policy: FetchPolicy,
) -> Result<ListPage<D::Item>, FetchError> {
    let data = client
        .query(&dataset.list_request(page).with_policy(policy))
        .await?;
    dataset.read_list(page, data)
}

pub async fn fetch_detail<D: Dataset>(
    client: &DataClient,
    dataset: &D,
    id: &str,
) -> Result<D::Detail, FetchError> {
    let data = client.query(&dataset.detail_request(id)).await?;
    dataset.read_detail(id, data)
}

/// Deserializes a `data` payload into its typed shape.
pub(crate) fn decode<T: DeserializeOwned>(data: Value) -> Result<T, FetchError> {
    serde_json::from_value(data).map_err(|e| FetchError::Decode(e.to_string()))
}

pub(crate) fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}
