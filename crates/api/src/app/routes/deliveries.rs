use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use shiptrack_core::DeliveryId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_delivery))
        .route("/:id/status", get(get_delivery_status))
}

pub async fn create_delivery(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateDeliveryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let command = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.create_delivery.execute(command).await {
        Ok(delivery) => (
            StatusCode::CREATED,
            Json(dto::CreateDeliveryResponse::from(&delivery)),
        )
            .into_response(),
        Err(e) => errors::delivery_error_to_response(e),
    }
}

pub async fn get_delivery_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let delivery_id = match id.parse::<DeliveryId>() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.get_delivery_status.execute(&delivery_id).await {
        Ok(view) => (StatusCode::OK, Json(dto::DeliveryStatusResponse::from(view))).into_response(),
        Err(e) => errors::delivery_error_to_response(e),
    }
}
