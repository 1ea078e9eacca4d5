//! Rick and Morty characters: page-numbered list with an authoritative
//! page count.

use serde::Deserialize;
use serde_json::{json, Value};

use super::catalog::{decode, or_dash, Dataset, ListPage};
use super::client::{FetchError, GraphQLRequest};

pub const CHARACTERS_QUERY: &str = r#"
query Characters($page: Int!) {
  characters(page: $page) {
    info { count pages next prev }
    results { id name status species gender image }
  }
}"#;

pub const CHARACTER_QUERY: &str = r#"
query Character($id: ID!) {
  character(id: $id) {
    id name status species type gender image created
    origin { name }
    location { name }
    episode { id name episode air_date }
  }
}"#;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Character {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub species: Option<String>,
    pub gender: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Place {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Episode {
    pub id: String,
    pub name: Option<String>,
    pub episode: Option<String>,
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CharacterDetail {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub species: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub gender: Option<String>,
    pub image: Option<String>,
    pub created: Option<String>,
    pub origin: Option<Place>,
    pub location: Option<Place>,
    #[serde(default)]
    pub episode: Vec<Episode>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CharactersPayload {
    info: Option<PageInfo>,
    results: Option<Vec<Character>>,
}

#[derive(Debug, Deserialize)]
struct CharactersData {
    characters: Option<CharactersPayload>,
}

#[derive(Debug, Deserialize)]
struct CharacterData {
    character: Option<CharacterDetail>,
}

#[derive(Debug, Clone, Default)]
pub struct Characters;

impl Dataset for Characters {
    type Item = Character;
    type Detail = CharacterDetail;

    fn title(&self) -> &'static str {
        "Characters"
    }

    fn list_request(&self, page: u32) -> GraphQLRequest {
        GraphQLRequest::new(CHARACTERS_QUERY, json!({ "page": page }))
    }

    fn read_list(&self, page: u32, data: Value) -> Result<ListPage<Character>, FetchError> {
        let payload = decode::<CharactersData>(data)?
            .characters
            .ok_or_else(|| FetchError::Decode("missing `characters`".into()))?;
        Ok(ListPage {
            items: payload.results.unwrap_or_default(),
            page_index: page,
            // An empty dataset still has one (empty) page.
            total_pages: Some(payload.info.and_then(|i| i.pages).unwrap_or(1).max(1)),
        })
    }

    fn detail_request(&self, id: &str) -> GraphQLRequest {
        GraphQLRequest::new(CHARACTER_QUERY, json!({ "id": id }))
    }

    fn read_detail(&self, id: &str, data: Value) -> Result<CharacterDetail, FetchError> {
        decode::<CharacterData>(data)?
            .character
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }

    fn item_id<'a>(&self, item: &'a Character) -> &'a str {
        &item.id
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Name", "Status", "Species", "Gender"]
    }

    fn row(&self, item: &Character) -> Vec<String> {
        vec![
            item.id.clone(),
            or_dash(item.name.as_deref()),
            or_dash(item.status.as_deref()),
            or_dash(item.species.as_deref()),
            or_dash(item.gender.as_deref()),
        ]
    }

    fn detail_heading(&self, detail: &CharacterDetail) -> String {
        or_dash(detail.name.as_deref())
    }

    fn detail_fields(&self, detail: &CharacterDetail) -> Vec<(&'static str, String)> {
        let episodes = detail
            .episode
            .iter()
            .map(|e| or_dash(e.episode.as_deref()))
            .collect::<Vec<_>>();
        vec![
            ("Status", or_dash(detail.status.as_deref())),
            ("Species", or_dash(detail.species.as_deref())),
            ("Type", or_dash(detail.kind.as_deref())),
            ("Gender", or_dash(detail.gender.as_deref())),
            ("Origin", or_dash(detail.origin.as_ref().and_then(|p| p.name.as_deref()))),
            ("Location", or_dash(detail.location.as_ref().and_then(|p| p.name.as_deref()))),
            ("Episodes", format!("{} ({})", episodes.len(), episodes.join(", "))),
            ("Image", or_dash(detail.image.as_deref())),
            ("Created", or_dash(detail.created.as_deref())),
        ]
    }
}
