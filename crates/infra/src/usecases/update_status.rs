use std::sync::Arc;

use shiptrack_core::DeliveryId;
use shiptrack_deliveries::{Delivery, DeliveryResult};

use super::webhook::WebhookStatusEvent;
use crate::status_service::{DeliveryStatusService, PollSummary};

/// Single entry point for status changes from either channel:
/// scheduled polling (carriers without push) or carrier webhooks.
pub struct UpdateDeliveryStatusUseCase {
    status_service: Arc<DeliveryStatusService>,
}

impl UpdateDeliveryStatusUseCase {
    pub fn new(status_service: Arc<DeliveryStatusService>) -> Self {
        Self { status_service }
    }

    pub async fn execute_from_polling(&self, delivery_id: &DeliveryId) -> DeliveryResult<()> {
        self.status_service.poll_one_delivery(delivery_id).await
    }

    pub async fn execute_from_polling_all(&self) -> DeliveryResult<PollSummary> {
        self.status_service.poll_all_active().await
    }

    pub async fn execute_from_webhook(
        &self,
        event: WebhookStatusEvent,
    ) -> DeliveryResult<Delivery> {
        self.status_service
            .apply_webhook_event(&event.tracking_id, event.status, event.timestamp)
            .await
    }
}
