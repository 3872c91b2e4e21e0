//! Handler tests for Items domain
//!
//! These drive the items router with `oneshot` over the in-memory store:
//! - Request deserialization and field validation
//! - Response shape and HTTP status codes
//! - Pagination links and search
//!
//! The PostgreSQL store is covered by `integration_test.rs`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_items::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app(repo: InMemoryItemRepository) -> Router {
    handlers::router(ItemService::new(repo))
}

fn repo() -> InMemoryItemRepository {
    InMemoryItemRepository::with_users([1, 2])
}

/// Store holding "Item 1" and "Item 2", both last modified by user 1.
async fn seeded() -> InMemoryItemRepository {
    let repo = repo();
    for (name, description) in [("Item 1", "First item"), ("Item 2", "Second item")] {
        repo.create(NewItem {
            name: name.to_string(),
            description: Some(description.to_string()),
            last_modified_by: 1,
        })
        .await
        .unwrap();
    }
    repo
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "testserver")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", "testserver")
        .body(Body::empty())
        .unwrap()
}

// Helper to parse JSON response body
async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_item_returns_201() {
    let response = app(repo())
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "Item 1", "description": "First item", "last_modified_by": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({"id": 1, "name": "Item 1", "description": "First item", "last_modified_by": 1})
    );
}

#[tokio::test]
async fn test_create_item_duplicate_name() {
    let response = app(seeded().await)
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "Item 1", "last_modified_by": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["name"][0]["code"], "unique");
    assert_eq!(
        body["error"]["name"][0]["message"],
        "item with this name already exists."
    );
}

#[tokio::test]
async fn test_create_item_missing_fields() {
    let response = app(repo())
        .oneshot(json_request("POST", "/", json!({"description": "no name"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["name"][0]["code"], "required");
    assert_eq!(body["error"]["last_modified_by"][0]["code"], "required");
}

#[tokio::test]
async fn test_create_item_unknown_user() {
    let response = app(repo())
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "Item 1", "last_modified_by": 99}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["last_modified_by"][0]["code"], "does_not_exist");
    assert_eq!(
        body["error"]["last_modified_by"][0]["message"],
        "Invalid pk \"99\" - object does not exist."
    );
}

#[tokio::test]
async fn test_create_item_name_too_long() {
    let response = app(repo())
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "x".repeat(256), "last_modified_by": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["name"][0]["code"], "max_length");
}

#[tokio::test]
async fn test_create_item_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app(repo()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_list_items() {
    let response = app(seeded().await).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(body["results"][0]["name"], "Item 1");
    assert_eq!(body["results"][1]["name"], "Item 2");
}

#[tokio::test]
async fn test_list_items_empty_store() {
    let response = app(repo()).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({"count": 0, "next": null, "previous": null, "results": []}));
}

#[tokio::test]
async fn test_search_items() {
    let response = app(seeded().await)
        .oneshot(get("/?search=Item%201"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Item 1");
}

#[tokio::test]
async fn test_search_matches_description_case_insensitively() {
    let response = app(seeded().await)
        .oneshot(get("/?search=SECOND"))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Item 2");
}

#[tokio::test]
async fn test_pagination_links() {
    let repo = repo();
    for i in 1..=25 {
        repo.create(NewItem {
            name: format!("Item {}", i),
            description: None,
            last_modified_by: 1,
        })
        .await
        .unwrap();
    }
    let app = app(repo);

    let first = json_body(app.clone().oneshot(get("/")).await.unwrap()).await;
    assert_eq!(first["count"], 25);
    assert_eq!(first["results"].as_array().unwrap().len(), 10);
    assert_eq!(first["next"], "http://testserver/?page=2");
    assert_eq!(first["previous"], Value::Null);

    let second = json_body(app.clone().oneshot(get("/?page=2")).await.unwrap()).await;
    assert_eq!(second["results"][0]["id"], 11);
    assert_eq!(second["next"], "http://testserver/?page=3");
    assert_eq!(second["previous"], "http://testserver/");

    let last = json_body(app.oneshot(get("/?page=last")).await.unwrap()).await;
    assert_eq!(last["results"].as_array().unwrap().len(), 5);
    assert_eq!(last["next"], Value::Null);
    assert_eq!(last["previous"], "http://testserver/?page=2");
}

#[tokio::test]
async fn test_pagination_keeps_search_parameter() {
    let repo = repo();
    for i in 1..=12 {
        repo.create(NewItem {
            name: format!("Widget {}", i),
            description: None,
            last_modified_by: 1,
        })
        .await
        .unwrap();
    }

    let body = json_body(app(repo).oneshot(get("/?search=Widget")).await.unwrap()).await;
    assert_eq!(body["count"], 12);
    assert_eq!(body["next"], "http://testserver/?search=Widget&page=2");
}

#[tokio::test]
async fn test_invalid_page_returns_404() {
    let app = app(seeded().await);

    for uri in ["/?page=2", "/?page=0", "/?page=abc"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_get_item() {
    let response = app(seeded().await).oneshot(get("/2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], 2);
    assert_eq!(body["name"], "Item 2");
    assert_eq!(body["last_modified_by"], 1);
}

#[tokio::test]
async fn test_get_missing_item_returns_404() {
    let app = app(seeded().await);

    for uri in ["/999", "/abc"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_patch_item_changes_only_given_fields() {
    let response = app(seeded().await)
        .oneshot(json_request(
            "PATCH",
            "/1",
            json!({"description": "Updated", "last_modified_by": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({"id": 1, "name": "Item 1", "description": "Updated", "last_modified_by": 2})
    );
}

#[tokio::test]
async fn test_put_item_renames() {
    let response = app(seeded().await)
        .oneshot(json_request("PUT", "/1", json!({"name": "Renamed"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Renamed");
}

#[tokio::test]
async fn test_update_to_existing_name_fails() {
    let response = app(seeded().await)
        .oneshot(json_request("PATCH", "/1", json!({"name": "Item 2"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["name"][0]["code"], "unique");
}

#[tokio::test]
async fn test_update_rejects_null_user() {
    let response = app(seeded().await)
        .oneshot(json_request("PATCH", "/1", json!({"last_modified_by": null})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"]["last_modified_by"][0]["code"],
        "null"
    );
}

#[tokio::test]
async fn test_update_missing_item_returns_404() {
    let response = app(seeded().await)
        .oneshot(json_request("PATCH", "/999", json!({"name": "Ghost"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_item() {
    let app = app(seeded().await);

    let request = Request::builder()
        .method("DELETE")
        .uri("/1")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get("/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(app.oneshot(get("/")).await.unwrap()).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_delete_missing_item_returns_404() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/999")
        .body(Body::empty())
        .unwrap();

    let response = app(repo()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_removed_user_shows_as_null() {
    let repo = seeded().await;
    repo.remove_user(1).await;

    let body = json_body(app(repo).oneshot(get("/1")).await.unwrap()).await;
    assert_eq!(body["last_modified_by"], Value::Null);
    assert_eq!(body["name"], "Item 1");
}

#[tokio::test]
async fn test_pagination_links_follow_forwarded_proto() {
    let repo = repo();
    for i in 1..=11 {
        repo.create(NewItem {
            name: format!("Item {}", i),
            description: None,
            last_modified_by: 1,
        })
        .await
        .unwrap();
    }

    let request = Request::builder()
        .uri("/")
        .header("host", "items.example.com")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let body = json_body(app(repo).oneshot(request).await.unwrap()).await;

    assert_eq!(body["next"], "https://items.example.com/?page=2");
}

#[tokio::test]
async fn test_empty_page_parameter_is_first_page() {
    let response = app(seeded().await).oneshot(get("/?page=")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["name"], "Item 1");
}

#[tokio::test]
async fn test_created_item_reads_back_identically() {
    let app = app(repo());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "Item 1", "description": "First item", "last_modified_by": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;

    let uri = format!("/{}", created["id"]);
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, created);
}

#[tokio::test]
async fn test_rename_leaves_other_fields_and_advances_updated_at() {
    let repo = seeded().await;
    let before = repo.get_by_id(1).await.unwrap().unwrap();

    let response = app(repo.clone())
        .oneshot(json_request("PATCH", "/1", json!({"name": "Renamed"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"id": 1, "name": "Renamed", "description": "First item", "last_modified_by": 1})
    );

    let after = repo.get_by_id(1).await.unwrap().unwrap();
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn test_duplicate_create_leaves_count_unchanged() {
    let app = app(seeded().await);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "Item 2", "description": "again", "last_modified_by": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(app.oneshot(get("/")).await.unwrap()).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][1]["description"], "Second item");
}

#[tokio::test]
async fn test_update_missing_item_with_malformed_body_returns_404() {
    let app = app(seeded().await);

    let malformed = |uri: &str| {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap()
    };

    let response = app.clone().oneshot(malformed("/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(malformed("/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
