use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use shiptrack_core::{Clock, TrackingId};
use shiptrack_deliveries::selection::LIGHT_PROVIDER;
use shiptrack_deliveries::{
    Address, DeliveryStatus, ProviderError, ShipmentContent, ShippingLabel, ShippingProvider,
};

/// Light-parcel carrier. Pushes status changes to `/webhooks/tls/status`.
pub struct TlsShippingProvider {
    clock: Arc<dyn Clock>,
}

impl TlsShippingProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl ShippingProvider for TlsShippingProvider {
    fn name(&self) -> &str {
        LIGHT_PROVIDER
    }

    async fn create_shipping_label(
        &self,
        sender: &Address,
        recipient: &Address,
        content: &ShipmentContent,
    ) -> Result<ShippingLabel, ProviderError> {
        let tracking_id = TrackingId::new();
        let text =
            ShippingLabel::render_content(LIGHT_PROVIDER, &tracking_id, sender, recipient, content);
        let label = ShippingLabel::new(text, tracking_id, self.clock.now())?;

        info!(provider = LIGHT_PROVIDER, tracking_id = %tracking_id, "shipping label created");
        Ok(label)
    }

    fn supports_webhooks(&self) -> bool {
        true
    }

    /// Not authoritative: updates arrive by webhook. Always `Created`.
    async fn get_delivery_status(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<DeliveryStatus, ProviderError> {
        warn!(
            provider = LIGHT_PROVIDER,
            tracking_id = %tracking_id,
            "status queried for a webhook-based carrier; updates arrive by webhook"
        );
        Ok(DeliveryStatus::Created)
    }
}
