use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;

use shiptrack_core::TrackingId;
use shiptrack_deliveries::{Delivery, DeliveryResult, DeliveryStatus};

use crate::status_service::DeliveryStatusService;

/// Status change pushed by a carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookStatusEvent {
    pub tracking_id: TrackingId,
    pub status: DeliveryStatus,
    /// Carrier-side event time.
    pub timestamp: DateTime<Utc>,
}

pub struct UpdateDeliveryStatusWebhookUseCase {
    status_service: Arc<DeliveryStatusService>,
}

impl UpdateDeliveryStatusWebhookUseCase {
    pub fn new(status_service: Arc<DeliveryStatusService>) -> Self {
        Self { status_service }
    }

    #[instrument(skip(self), fields(tracking_id = %event.tracking_id, status = %event.status), err)]
    pub async fn execute(&self, event: WebhookStatusEvent) -> DeliveryResult<Delivery> {
        self.status_service
            .apply_webhook_event(&event.tracking_id, event.status, event.timestamp)
            .await
    }
}
