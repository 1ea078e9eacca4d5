use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use gated_explorer::graphql::{
    fetch_page, Characters, DataClient, FetchError, FetchPolicy, GraphQLRequest, GraphQLTransport,
    ReqwestTransport,
};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn graphql(State(seen): State<Seen>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    seen.lock().unwrap().push(body.clone());
    let query = body["query"].as_str().unwrap_or_default();

    if query.contains("broken") {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" })));
    }
    if query.contains("invalid") {
        return (
            StatusCode::OK,
            Json(json!({
                "data": null,
                "errors": [{ "message": "Cannot query field \"invalid\"" }, { "message": "second" }]
            })),
        );
    }
    if query.contains("characters(page") {
        let page = body["variables"]["page"].as_u64().unwrap_or(1);
        return (
            StatusCode::OK,
            Json(json!({
                "data": { "characters": {
                    "info": { "count": 2, "pages": 7, "next": page + 1, "prev": null },
                    "results": [
                        { "id": "1", "name": "Rick Sanchez", "status": "Alive", "species": "Human",
                          "gender": "Male", "image": null },
                        { "id": "2", "name": "Morty Smith", "status": "Alive", "species": "Human",
                          "gender": "Male", "image": null }
                    ]
                } }
            })),
        );
    }
    (StatusCode::OK, Json(json!({ "data": { "ping": "pong" } })))
}

async fn spawn_server() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/graphql", post(graphql))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/graphql", addr), seen)
}

fn transport(endpoint: &str) -> ReqwestTransport {
    ReqwestTransport::new(endpoint, Duration::from_secs(5))
}

#[tokio::test]
async fn test_success_returns_data_member() {
    let (endpoint, _) = spawn_server().await;
    let data = transport(&endpoint)
        .execute(&GraphQLRequest::new("{ ping }", json!({})))
        .await
        .unwrap();
    assert_eq!(data, json!({ "ping": "pong" }));
}

#[tokio::test]
async fn test_request_body_carries_query_and_variables() {
    let (endpoint, seen) = spawn_server().await;
    transport(&endpoint)
        .execute(&GraphQLRequest::new("{ ping }", json!({ "page": 4 })))
        .await
        .unwrap();

    let bodies = seen.lock().unwrap().clone();
    assert_eq!(bodies, vec![json!({ "query": "{ ping }", "variables": { "page": 4 } })]);
}

#[tokio::test]
async fn test_graphql_errors_are_joined() {
    let (endpoint, _) = spawn_server().await;
    let err = transport(&endpoint)
        .execute(&GraphQLRequest::new("{ invalid }", json!({})))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::GraphQL("Cannot query field \"invalid\"; second".into())
    );
}

#[tokio::test]
async fn test_http_failure_maps_to_status() {
    let (endpoint, _) = spawn_server().await;
    let err = transport(&endpoint)
        .execute(&GraphQLRequest::new("{ broken }", json!({})))
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::Status(500));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = transport(&format!("http://{}/graphql", addr))
        .execute(&GraphQLRequest::new("{ ping }", json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn test_characters_page_end_to_end() {
    let (endpoint, seen) = spawn_server().await;
    let client = DataClient::connect(&endpoint, Duration::from_secs(5));

    let page = fetch_page(&client, &Characters, 2, FetchPolicy::CacheFirst).await.unwrap();
    assert_eq!(page.page_index, 2);
    assert_eq!(page.total_pages, Some(7));
    assert_eq!(page.items[0].name.as_deref(), Some("Rick Sanchez"));

    // Second call for the same page is answered from the response cache.
    fetch_page(&client, &Characters, 2, FetchPolicy::CacheFirst).await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_network_only_page_reaches_server_again() {
    let (endpoint, seen) = spawn_server().await;
    let client = DataClient::connect(&endpoint, Duration::from_secs(5));

    fetch_page(&client, &Characters, 1, FetchPolicy::CacheFirst).await.unwrap();
    fetch_page(&client, &Characters, 1, FetchPolicy::NetworkOnly).await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);
}
