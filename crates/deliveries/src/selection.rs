//! Weight-based carrier selection.

use std::sync::Arc;

use crate::dimensions::Dimensions;
use crate::error::{DeliveryError, DeliveryResult};
use crate::provider::{ProviderRegistry, ShippingProvider};

/// Parcels strictly heavier than this go with the heavy-goods carrier.
pub const WEIGHT_THRESHOLD_KG: f64 = 20.0;

/// Carrier for parcels above [`WEIGHT_THRESHOLD_KG`]. Polled for status.
pub const HEAVY_PROVIDER: &str = "NRW";

/// Carrier for parcels at or below [`WEIGHT_THRESHOLD_KG`]. Pushes webhooks.
pub const LIGHT_PROVIDER: &str = "TLS";

pub fn provider_name_for_weight(weight_kg: f64) -> &'static str {
    if weight_kg > WEIGHT_THRESHOLD_KG {
        HEAVY_PROVIDER
    } else {
        LIGHT_PROVIDER
    }
}

/// Picks the carrier for a shipment from the registered set.
#[derive(Debug, Clone)]
pub struct ProviderSelectionService {
    registry: ProviderRegistry,
}

impl ProviderSelectionService {
    pub fn new(registry: ProviderRegistry) -> DeliveryResult<Self> {
        if registry.is_empty() {
            return Err(DeliveryError::Configuration(
                "At least one shipping provider is required".to_string(),
            ));
        }
        Ok(Self { registry })
    }

    /// Uses the declared parcel weight, not the sum of item weights.
    pub fn select_provider(
        &self,
        dimensions: &Dimensions,
    ) -> DeliveryResult<Arc<dyn ShippingProvider>> {
        self.registry
            .resolve(provider_name_for_weight(dimensions.weight()))
    }
}
