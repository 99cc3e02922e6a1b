//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: use case and scheduler wiring over a chosen store
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and mapping to domain types
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(routes::system::route_not_found)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
