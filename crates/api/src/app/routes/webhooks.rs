use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/tls/status", post(tls_status))
}

/// Status push from the TLS carrier.
pub async fn tls_status(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::WebhookStatusRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let event = match body.into_event() {
        Ok(e) => e,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.webhook_status.execute(event).await {
        Ok(delivery) => {
            info!(
                tracking_id = %event.tracking_id,
                status = %delivery.status(),
                "TLS webhook applied"
            );
            (StatusCode::OK, Json(dto::WebhookAck { success: true })).into_response()
        }
        Err(e) => errors::delivery_error_to_response(e),
    }
}
