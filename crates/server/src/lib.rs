//! Forno order server library.
//!
//! This crate provides the order server functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod payments;
pub mod pricing;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full application router over the given state.
///
/// Process-global layers (Sentry) are added by the binary; tests drive this
/// router directly.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
