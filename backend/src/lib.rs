//! # Item Service
//!
//! A small REST service exposing CRUD operations over a single "item" resource
//! held in memory.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum router + request logging)
//!     ↓
//! REST handlers (decode / delegate / encode)
//!     ↓
//! Storage (ItemStorage trait, in-memory engine)
//! ```
//!
//! Process bootstrap (configuration, log sink, graceful shutdown) lives in
//! [`config`], [`logging`] and [`server`] and is driven from `main.rs`.

pub mod config;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod rest;
pub mod server;
pub mod storage;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::storage::ItemStorage;

/// Application state shared with every handler
#[derive(Clone)]
pub struct AppState {
    pub item_storage: Arc<dyn ItemStorage>,
}

impl AppState {
    pub fn new(item_storage: Arc<dyn ItemStorage>) -> Self {
        Self { item_storage }
    }
}

/// Create the Axum router with all item routes configured
///
/// Every request, matched or not, passes through [`middleware::log_requests`].
/// When `cors_origin` is set, cross-origin requests from that origin are allowed.
pub fn create_router(app_state: AppState, cors_origin: Option<HeaderValue>) -> Router {
    let router = Router::new()
        .route("/items", get(rest::list_items).post(rest::create_item))
        .route("/items/:id", put(rest::update_item).delete(rest::delete_item))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(app_state);

    match cors_origin {
        Some(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers(Any),
        ),
        None => router,
    }
}
