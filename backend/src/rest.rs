//! # REST API for Item Management
//!
//! Each handler decodes the request, delegates to [`ItemStorage`] and encodes
//! the result.
//!
//! Storage failures, including `ItemExists` and `ItemNotFound`, are reported
//! as `500 Internal Server Error` with the error text as a plain body. Malformed
//! request bodies are reported as `400 Bad Request`.
//!
//! [`ItemStorage`]: crate::storage::ItemStorage

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::models::Item;
use crate::AppState;

fn bad_request(message: String) -> Response {
    debug!("Rejecting malformed item body: {}", message);
    (StatusCode::BAD_REQUEST, message).into_response()
}

/// Decode the first JSON value of a request body as an [`Item`]
///
/// Anything after the first value is ignored and a `null` body yields an empty
/// item. An empty body or malformed JSON maps to 400.
fn decode_item(body: &[u8]) -> Result<Item, Response> {
    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Option<Item>>();
    match values.next() {
        Some(Ok(item)) => Ok(item.unwrap_or_default()),
        Some(Err(e)) => Err(bad_request(e.to_string())),
        None => Err(bad_request("EOF".to_string())),
    }
}

/// Axum handler function for GET /items
pub async fn list_items(State(state): State<AppState>) -> Response {
    match state.item_storage.get_items() {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => {
            error!("Error listing items: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Axum handler function for POST /items
pub async fn create_item(State(state): State<AppState>, body: Bytes) -> Response {
    let item = match decode_item(&body) {
        Ok(item) => item,
        Err(response) => return response,
    };
    debug!("POST /items - item: {:?}", item);

    match state.item_storage.create_item(item.clone()) {
        Ok(()) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => {
            error!("Error creating item {}: {}", item.id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Axum handler function for PUT /items/:id
///
/// The decoded body is stored under the path `id` even if its own `id` differs.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let item = match decode_item(&body) {
        Ok(item) => item,
        Err(response) => return response,
    };
    debug!("PUT /items/{} - item: {:?}", id, item);

    match state.item_storage.update_item(&id, item.clone()) {
        Ok(()) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => {
            error!("Error updating item {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Axum handler function for DELETE /items/:id
pub async fn delete_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    debug!("DELETE /items/{}", id);

    match state.item_storage.delete_item(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Error deleting item {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
