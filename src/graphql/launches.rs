//! SpaceX past launches: limit/offset list with no total, so forward
//! navigation is never bounded.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::catalog::{decode, or_dash, Dataset, ListPage};
use super::client::{FetchError, GraphQLRequest};

pub const LAUNCHES_QUERY: &str = r#"
query LaunchesPast($limit: Int!, $offset: Int!) {
  launchesPast(limit: $limit, offset: $offset) {
    id mission_name launch_date_utc launch_success
    rocket { rocket_name }
  }
}"#;

pub const LAUNCH_QUERY: &str = r#"
query Launch($id: ID!) {
  launch(id: $id) {
    id mission_name details launch_date_utc launch_success
    launch_site { site_name_long }
    rocket { rocket_name rocket_type }
    links { article_link wikipedia video_link flickr_images }
  }
}"#;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Rocket {
    pub rocket_name: Option<String>,
    pub rocket_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Launch {
    pub id: String,
    pub mission_name: Option<String>,
    pub launch_date_utc: Option<String>,
    pub launch_success: Option<bool>,
    pub rocket: Option<Rocket>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LaunchSite {
    pub site_name_long: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LaunchLinks {
    pub article_link: Option<String>,
    pub wikipedia: Option<String>,
    pub video_link: Option<String>,
    #[serde(default)]
    pub flickr_images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LaunchDetail {
    pub id: String,
    pub mission_name: Option<String>,
    pub details: Option<String>,
    pub launch_date_utc: Option<String>,
    pub launch_success: Option<bool>,
    pub launch_site: Option<LaunchSite>,
    pub rocket: Option<Rocket>,
    pub links: Option<LaunchLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchesData {
    launches_past: Option<Vec<Option<Launch>>>,
}

#[derive(Debug, Deserialize)]
struct LaunchData {
    launch: Option<LaunchDetail>,
}

#[derive(Debug, Clone)]
pub struct Launches {
    page_size: u32,
}

impl Launches {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset_for(&self, page: u32) -> u32 {
        page.max(1).saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for Launches {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

fn format_date(raw: Option<&str>) -> String {
    match raw.map(DateTime::parse_from_rfc3339) {
        Some(Ok(date)) => date.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string(),
        _ => or_dash(raw),
    }
}

fn format_outcome(success: Option<bool>) -> String {
    match success {
        Some(true) => "Success",
        Some(false) => "Failure",
        None => "Unknown",
    }
    .to_string()
}

impl Dataset for Launches {
    type Item = Launch;
    type Detail = LaunchDetail;

    fn title(&self) -> &'static str {
        "Launches"
    }

    fn list_request(&self, page: u32) -> GraphQLRequest {
        GraphQLRequest::new(
            LAUNCHES_QUERY,
            json!({ "limit": self.page_size, "offset": self.offset_for(page) }),
        )
    }

    fn read_list(&self, page: u32, data: Value) -> Result<ListPage<Launch>, FetchError> {
        let launches = decode::<LaunchesData>(data)?
            .launches_past
            .ok_or_else(|| FetchError::Decode("missing `launchesPast`".into()))?;
        Ok(ListPage {
            items: launches.into_iter().flatten().collect(),
            page_index: page,
            total_pages: None,
        })
    }

    fn detail_request(&self, id: &str) -> GraphQLRequest {
        GraphQLRequest::new(LAUNCH_QUERY, json!({ "id": id }))
    }

    fn read_detail(&self, id: &str, data: Value) -> Result<LaunchDetail, FetchError> {
        decode::<LaunchData>(data)?
            .launch
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }

    fn item_id<'a>(&self, item: &'a Launch) -> &'a str {
        &item.id
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Mission", "Date", "Rocket", "Outcome"]
    }

    fn row(&self, item: &Launch) -> Vec<String> {
        vec![
            item.id.clone(),
            or_dash(item.mission_name.as_deref()),
            format_date(item.launch_date_utc.as_deref()),
            or_dash(item.rocket.as_ref().and_then(|r| r.rocket_name.as_deref())),
            format_outcome(item.launch_success),
        ]
    }

    fn detail_heading(&self, detail: &LaunchDetail) -> String {
        or_dash(detail.mission_name.as_deref())
    }

    fn detail_fields(&self, detail: &LaunchDetail) -> Vec<(&'static str, String)> {
        let rocket = detail.rocket.as_ref();
        let links = detail.links.as_ref();
        let images = links
            .and_then(|l| l.flickr_images.as_ref())
            .map(Vec::len)
            .unwrap_or(0);
        vec![
            ("Date", format_date(detail.launch_date_utc.as_deref())),
            ("Outcome", format_outcome(detail.launch_success)),
            ("Site", or_dash(detail.launch_site.as_ref().and_then(|s| s.site_name_long.as_deref()))),
            ("Rocket", or_dash(rocket.and_then(|r| r.rocket_name.as_deref()))),
            ("Rocket type", or_dash(rocket.and_then(|r| r.rocket_type.as_deref()))),
            ("Details", or_dash(detail.details.as_deref())),
            ("Article", or_dash(links.and_then(|l| l.article_link.as_deref()))),
            ("Wikipedia", or_dash(links.and_then(|l| l.wikipedia.as_deref()))),
            ("Video", or_dash(links.and_then(|l| l.video_link.as_deref()))),
            ("Images", images.to_string()),
        ]
    }
}
