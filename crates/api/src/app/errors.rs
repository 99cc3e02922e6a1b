use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use shiptrack_core::DomainError;
use shiptrack_deliveries::DeliveryError;

pub fn delivery_error_to_response(err: DeliveryError) -> axum::response::Response {
    match err {
        DeliveryError::Domain(e) => domain_error_to_response(e),
        DeliveryError::DeliveryNotFound(_) | DeliveryError::TrackingNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        DeliveryError::DuplicateOrder(_) | DeliveryError::WebhookNotSupported { .. } => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        DeliveryError::Provider(e) => {
            error!(error = %e, "shipping provider call failed");
            json_error(StatusCode::BAD_GATEWAY, "provider_error", e.to_string())
        }
        DeliveryError::ProviderNotFound(_)
        | DeliveryError::Repository(_)
        | DeliveryError::Configuration(_) => {
            error!(error = %err, "request failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvariantViolation(msg) => {
            error!(error = %msg, "domain invariant violated");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            )
        }
    }
}

/// Malformed or mistyped JSON bodies are validation failures.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        rejection.body_text(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
