use std::sync::Arc;

use shiptrack_core::DeliveryId;
use shiptrack_deliveries::DeliveryResult;

use crate::status_service::{DeliveryStatusService, PollSummary};

/// Polling entry point used by the scheduler.
pub struct PollDeliveryStatusUseCase {
    status_service: Arc<DeliveryStatusService>,
}

impl PollDeliveryStatusUseCase {
    pub fn new(status_service: Arc<DeliveryStatusService>) -> Self {
        Self { status_service }
    }

    pub async fn execute(&self, delivery_id: &DeliveryId) -> DeliveryResult<()> {
        self.status_service.poll_one_delivery(delivery_id).await
    }

    pub async fn execute_for_all_active(&self) -> DeliveryResult<PollSummary> {
        self.status_service.poll_all_active().await
    }
}
