use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use jsxed_server::app;
use jsxed_store::{ComponentStore, FileStore, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn memory_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (app(store.clone()), store)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn text_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_returns_id() {
    let (app, store) = memory_app();
    let (status, body) = send(
        app,
        json_request("POST", "/component", json!({ "value": "<div />" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let id = serde_json::from_str::<Value>(&body).unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(store.read(&id).unwrap().as_deref(), Some("<div />"));
}

#[tokio::test]
async fn test_create_accepts_json_string_and_raw_text() {
    let (app, store) = memory_app();

    let (status, body) = send(
        app.clone(),
        json_request("POST", "/component", json!("<p>json</p>")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        store.read(id["id"].as_str().unwrap()).unwrap().as_deref(),
        Some("<p>json</p>")
    );

    let (status, body) = send(app, text_request("POST", "/component", "<p>raw</p>")).await;
    assert_eq!(status, StatusCode::OK);
    let id: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        store.read(id["id"].as_str().unwrap()).unwrap().as_deref(),
        Some("<p>raw</p>")
    );
}

#[tokio::test]
async fn test_create_rejects_missing_body() {
    let (app, _) = memory_app();

    let (status, body) = send(app.clone(), text_request("POST", "/component", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "error": "Missing string body" })
    );

    let (status, _) = send(
        app,
        json_request("POST", "/component", json!({ "value": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_existing_component() {
    let (app, store) = memory_app();
    let id = store.create("<div />").unwrap();

    let (status, body) = send(
        app,
        json_request(
            "PUT",
            &format!("/component/{id}"),
            json!({ "value": "<span />" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "id": id, "value": "<span />" })
    );
    assert_eq!(store.read(&id).unwrap().as_deref(), Some("<span />"));
}

#[tokio::test]
async fn test_update_unknown_component() {
    let (app, store) = memory_app();

    let (status, body) = send(
        app,
        json_request("PUT", "/component/missing", json!({ "value": "<p />" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "error": "Not Found" })
    );
    assert_eq!(store.read("missing").unwrap(), None);
}

#[tokio::test]
async fn test_preview_returns_plain_text() {
    let (app, store) = memory_app();
    let id = store.create("<h1>Hi</h1>").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/preview/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>Hi</h1>");

    let (status, body) = send(
        app,
        Request::builder()
            .uri("/preview/nope")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found");
}

#[tokio::test]
async fn test_file_store_backed_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path().join("components.json")));
    let app = app(store.clone());

    let (_, body) = send(
        app.clone(),
        text_request("POST", "/component", "<main>v1</main>"),
    )
    .await;
    let id = serde_json::from_str::<Value>(&body).unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    send(
        app.clone(),
        text_request("PUT", &format!("/component/{id}"), "<main>v2</main>"),
    )
    .await;

    let (status, body) = send(
        app,
        Request::builder()
            .uri(format!("/preview/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<main>v2</main>");

    let reopened = FileStore::new(dir.path().join("components.json"));
    assert_eq!(
        reopened.read(&id).unwrap().as_deref(),
        Some("<main>v2</main>")
    );
}
