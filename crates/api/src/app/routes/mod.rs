use axum::Router;

pub mod deliveries;
pub mod system;
pub mod webhooks;

/// Router for every delivery endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/deliveries", deliveries::router())
        .nest("/webhooks", webhooks::router())
}
