use std::sync::Arc;

use chrono::{DateTime, Utc};

use shiptrack_core::{Clock, DeliveryId};
use shiptrack_deliveries::{DeliveryError, DeliveryRepository, DeliveryResult, DeliveryStatus};

/// Status snapshot returned to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStatusView {
    pub delivery_id: DeliveryId,
    pub status: DeliveryStatus,
    /// Time of the read, not of the last status change.
    pub last_updated: DateTime<Utc>,
}

pub struct GetDeliveryStatusUseCase {
    repository: Arc<dyn DeliveryRepository>,
    clock: Arc<dyn Clock>,
}

impl GetDeliveryStatusUseCase {
    pub fn new(repository: Arc<dyn DeliveryRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn execute(&self, delivery_id: &DeliveryId) -> DeliveryResult<DeliveryStatusView> {
        let delivery = self
            .repository
            .find_by_id(delivery_id)
            .await?
            .ok_or(DeliveryError::DeliveryNotFound(*delivery_id))?;

        Ok(DeliveryStatusView {
            delivery_id: *delivery_id,
            status: delivery.status(),
            last_updated: self.clock.now(),
        })
    }
}
