use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use shiptrack_core::{Clock, TrackingId};
use shiptrack_deliveries::selection::HEAVY_PROVIDER;
use shiptrack_deliveries::{
    Address, DeliveryStatus, ProviderError, ShipmentContent, ShippingLabel, ShippingProvider,
};

/// Heavy-goods carrier. Has no push channel, so its status must be polled.
///
/// The carrier's tracking system is simulated: status is derived from the
/// time elapsed since the label was issued.
pub struct NrwShippingProvider {
    clock: Arc<dyn Clock>,
    issued: RwLock<HashMap<TrackingId, DateTime<Utc>>>,
}

impl NrwShippingProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            issued: RwLock::new(HashMap::new()),
        }
    }

    /// Number of labels this carrier has issued.
    pub fn issued_count(&self) -> usize {
        self.issued.read().map(|m| m.len()).unwrap_or(0)
    }

    fn unavailable(message: impl Into<String>) -> ProviderError {
        ProviderError::Unavailable {
            provider: HEAVY_PROVIDER.to_string(),
            message: message.into(),
        }
    }
}

/// Simulated progression: <5 min created, <15 shipped, <45 in transit, then delivered.
pub fn status_for_elapsed(elapsed: Duration) -> DeliveryStatus {
    if elapsed < Duration::minutes(5) {
        DeliveryStatus::Created
    } else if elapsed < Duration::minutes(15) {
        DeliveryStatus::Shipped
    } else if elapsed < Duration::minutes(45) {
        DeliveryStatus::InTransit
    } else {
        DeliveryStatus::Delivered
    }
}

#[async_trait]
impl ShippingProvider for NrwShippingProvider {
    fn name(&self) -> &str {
        HEAVY_PROVIDER
    }

    async fn create_shipping_label(
        &self,
        sender: &Address,
        recipient: &Address,
        content: &ShipmentContent,
    ) -> Result<ShippingLabel, ProviderError> {
        let tracking_id = TrackingId::new();
        let now = self.clock.now();
        let text =
            ShippingLabel::render_content(HEAVY_PROVIDER, &tracking_id, sender, recipient, content);
        let label = ShippingLabel::new(text, tracking_id, now)?;

        self.issued
            .write()
            .map_err(|_| Self::unavailable("tracking registry lock poisoned"))?
            .insert(tracking_id, now);

        info!(provider = HEAVY_PROVIDER, tracking_id = %tracking_id, "shipping label created");
        Ok(label)
    }

    fn supports_webhooks(&self) -> bool {
        false
    }

    async fn get_delivery_status(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<DeliveryStatus, ProviderError> {
        let issued_at = self
            .issued
            .read()
            .map_err(|_| Self::unavailable("tracking registry lock poisoned"))?
            .get(tracking_id)
            .copied()
            .ok_or_else(|| ProviderError::UnknownTrackingId {
                provider: HEAVY_PROVIDER.to_string(),
                tracking_id: *tracking_id,
            })?;

        let status = status_for_elapsed(self.clock.now() - issued_at);
        debug!(
            provider = HEAVY_PROVIDER,
            tracking_id = %tracking_id,
            status = %status,
            "status queried"
        );
        Ok(status)
    }
}
