//! GraphQL Module
//!
//! Data client, response cache and the catalog of list/detail queries for
//! the two public datasets.

mod cache;
mod catalog;
mod client;
pub mod characters;
pub mod launches;

pub use cache::ResponseCache;
pub use catalog::{fetch_detail, fetch_page, Dataset, ListPage};
pub use characters::{Character, CharacterDetail, Characters};
pub use client::{
    DataClient, FetchError, FetchPolicy, GraphQLRequest, GraphQLTransport, ReqwestTransport,
};
pub use launches::{Launch, LaunchDetail, Launches};
