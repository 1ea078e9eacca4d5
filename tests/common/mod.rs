#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use gated_explorer::graphql::{DataClient, FetchError, GraphQLRequest, GraphQLTransport, Launches};
use gated_explorer::session::{MemoryStorage, SessionContext, SessionStore};
use gated_explorer::tui::{App, Clients};
use gated_explorer::views::Route;

/// Answers like the two public APIs, records every request, and can be told
/// to fail or to stall.
pub struct ScriptedTransport {
    name: &'static str,
    pub calls: Mutex<Vec<Value>>,
    fail_with: Option<FetchError>,
    delay_page_one: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Mutex::new(Vec::new()),
            fail_with: None,
            delay_page_one: None,
        }
    }

    pub fn failing(name: &'static str, error: FetchError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new(name)
        }
    }

    pub fn slow_first_page(name: &'static str, delay: Duration) -> Self {
        Self {
            delay_page_one: Some(delay),
            ..Self::new(name)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requested_variables(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphQLTransport for ScriptedTransport {
    fn endpoint(&self) -> &str {
        self.name
    }

    async fn execute(&self, request: &GraphQLRequest) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push(request.variables.clone());

        let page = request.variables["page"].as_u64();
        let offset = request.variables["offset"].as_u64();
        if let Some(delay) = self.delay_page_one {
            if page == Some(1) || offset == Some(0) {
                tokio::time::sleep(delay).await;
            }
        }
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }

        if request.query.contains("characters(page") {
            let page = page.unwrap_or(1);
            let results: Vec<Value> = (1..=3)
                .map(|i| {
                    let id = (page - 1) * 3 + i;
                    json!({ "id": id.to_string(), "name": format!("Character {}", id),
                            "status": "Alive", "species": "Human", "gender": "Female", "image": null })
                })
                .collect();
            return Ok(json!({
                "characters": { "info": { "count": 9, "pages": 3, "next": null, "prev": null },
                                "results": results }
            }));
        }
        if request.query.contains("character(id") {
            let id = request.variables["id"].as_str().unwrap_or_default().to_string();
            return Ok(json!({
                "character": { "id": id, "name": format!("Character {}", id), "status": "Alive",
                               "species": "Human", "type": "", "gender": "Female", "image": null,
                               "created": null, "origin": { "name": "Earth" },
                               "location": { "name": "Earth" }, "episode": [] }
            }));
        }
        if request.query.contains("launchesPast") {
            let offset = offset.unwrap_or(0);
            let limit = request.variables["limit"].as_u64().unwrap_or(10);
            let launches: Vec<Value> = (offset..offset + limit)
                .map(|n| json!({ "id": format!("L{}", n), "mission_name": format!("Mission {}", n),
                                 "launch_date_utc": "2020-01-01T00:00:00.000Z",
                                 "launch_success": true, "rocket": { "rocket_name": "Falcon 9" } }))
                .collect();
            return Ok(json!({ "launchesPast": launches }));
        }
        if request.query.contains("launch(id") {
            return Ok(json!({ "launch": null }));
        }
        Err(FetchError::GraphQL(format!("unknown query: {}", request.query)))
    }
}

pub fn memory_session() -> (SessionStore, SessionContext) {
    let store = SessionStore::new(Arc::new(MemoryStorage::new()));
    let ctx = SessionContext::mount(store.clone());
    (store, ctx)
}

pub fn app_with(
    session: SessionContext,
    characters: Arc<ScriptedTransport>,
    launches: Arc<ScriptedTransport>,
    address: &str,
) -> App {
    App::new(
        session,
        Clients {
            characters: DataClient::new(characters),
            launches: DataClient::new(launches),
        },
        Launches::new(5),
        Route::parse(address),
    )
}

/// Waits for the next fetch result and feeds it to the app.
pub async fn settle(app: &mut App) {
    let event = tokio::time::timeout(Duration::from_secs(2), app.next_event())
        .await
        .expect("fetch did not report back")
        .expect("event channel closed");
    app.apply_event(event);
}
