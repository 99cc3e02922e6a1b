//! Error types for the deliveries bounded context.

use thiserror::Error;

use shiptrack_core::{DeliveryId, DomainError, OrderId, TrackingId};

/// Failure reported by a shipping carrier adapter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{provider}: unknown tracking id {tracking_id}")]
    UnknownTrackingId {
        provider: String,
        tracking_id: TrackingId,
    },

    #[error("{provider} is unavailable: {message}")]
    Unavailable { provider: String, message: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Failure reported by a delivery store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// Another delivery already exists for this order.
    #[error("a delivery already exists for order {0}")]
    DuplicateOrder(OrderId),

    #[error("storage error: {0}")]
    Storage(String),

    /// A stored record could not be turned back into a valid delivery.
    #[error("corrupt delivery record: {0}")]
    Corrupt(String),
}

/// Errors surfaced by delivery use cases and services.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeliveryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Delivery not found: {0}")]
    DeliveryNotFound(DeliveryId),

    #[error("Delivery with tracking ID {0} not found")]
    TrackingNotFound(TrackingId),

    #[error("A delivery already exists for order {0}")]
    DuplicateOrder(OrderId),

    #[error("No shipping provider registered under {0}")]
    ProviderNotFound(String),

    /// A status push arrived for a delivery whose carrier is polled instead.
    #[error("Carrier {provider} does not send status webhooks (tracking ID {tracking_id})")]
    WebhookNotSupported {
        provider: String,
        tracking_id: TrackingId,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<RepositoryError> for DeliveryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateOrder(order_id) => Self::DuplicateOrder(order_id),
            other => Self::Repository(other),
        }
    }
}

pub type DeliveryResult<T> = Result<T, DeliveryError>;
