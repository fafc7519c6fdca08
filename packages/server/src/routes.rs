//! Component HTTP routes
//!
//! - `POST /component` stores markup and returns its id
//! - `PUT /component/:id` replaces stored markup
//! - `GET /preview/:id` returns stored markup as plain text

use crate::error::ServerError;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use jsxed_store::ComponentStore;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ComponentStore>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub id: String,
    pub value: String,
}

/// Build the router over `store`
pub fn app(store: Arc<dyn ComponentStore>) -> Router {
    Router::new()
        .route("/component", post(create_component))
        .route("/component/:id", put(update_component))
        .route("/preview/:id", get(preview_component))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { store })
}

/// Markup carried by a request body: raw text, or JSON holding either a
/// string or `{ "value": "..." }`
pub fn body_value(headers: &HeaderMap, body: &str) -> Result<String, ServerError> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains("application/json"));

    let value = if is_json {
        match serde_json::from_str::<Value>(body)? {
            Value::String(value) => Some(value),
            Value::Object(mut fields) => match fields.remove("value") {
                Some(Value::String(value)) => Some(value),
                _ => None,
            },
            _ => None,
        }
    } else {
        Some(body.to_string())
    };

    value
        .filter(|value| !value.is_empty())
        .ok_or(ServerError::MissingBody)
}

/// Run a blocking store call off the async workers
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: FnOnce(&dyn ComponentStore) -> Result<T, jsxed_store::StoreError> + Send + 'static,
{
    let store = state.store.clone();
    Ok(tokio::task::spawn_blocking(move || f(store.as_ref())).await??)
}

async fn create_component(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<CreatedResponse>, ServerError> {
    let value = body_value(&headers, &body)?;
    let id = with_store(&state, move |store| store.create(&value)).await?;

    tracing::info!("Created component {}", id);
    Ok(Json(CreatedResponse { id }))
}

async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<UpdatedResponse>, ServerError> {
    let value = body_value(&headers, &body)?;

    let (store_id, store_value) = (id.clone(), value.clone());
    with_store(&state, move |store| store.update(&store_id, &store_value)).await?;

    tracing::info!("Updated component {}", id);
    Ok(Json(UpdatedResponse { id, value }))
}

async fn preview_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let lookup = id.clone();
    let stored = with_store(&state, move |store| store.read(&lookup)).await?;

    Ok(match stored {
        Some(value) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            value,
        )
            .into_response(),
        None => {
            tracing::debug!("Preview of unknown component {}", id);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    })
}
