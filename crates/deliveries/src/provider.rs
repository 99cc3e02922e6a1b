//! Carrier port and the registry that resolves carriers by name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use shiptrack_core::TrackingId;

use crate::address::Address;
use crate::error::{DeliveryError, DeliveryResult, ProviderError};
use crate::label::ShippingLabel;
use crate::shipment::ShipmentContent;
use crate::status::DeliveryStatus;

/// A shipping carrier.
///
/// Implementations issue labels and, when they cannot push updates, answer
/// status queries for tracking ids they issued.
#[async_trait]
pub trait ShippingProvider: Send + Sync {
    /// Registry key, e.g. `"NRW"`.
    fn name(&self) -> &str;

    async fn create_shipping_label(
        &self,
        sender: &Address,
        recipient: &Address,
        content: &ShipmentContent,
    ) -> Result<ShippingLabel, ProviderError>;

    /// `true` when the carrier pushes status changes instead of being polled.
    fn supports_webhooks(&self) -> bool;

    async fn get_delivery_status(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<DeliveryStatus, ProviderError>;
}

#[async_trait]
impl<P> ShippingProvider for Arc<P>
where
    P: ShippingProvider + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn create_shipping_label(
        &self,
        sender: &Address,
        recipient: &Address,
        content: &ShipmentContent,
    ) -> Result<ShippingLabel, ProviderError> {
        (**self).create_shipping_label(sender, recipient, content).await
    }

    fn supports_webhooks(&self) -> bool {
        (**self).supports_webhooks()
    }

    async fn get_delivery_status(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<DeliveryStatus, ProviderError> {
        (**self).get_delivery_status(tracking_id).await
    }
}

/// Carriers keyed by their `name()`.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ShippingProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_providers(
        providers: impl IntoIterator<Item = Arc<dyn ShippingProvider>>,
    ) -> DeliveryResult<Self> {
        let mut registry = Self::new();
        for provider in providers {
            registry.register(provider)?;
        }
        Ok(registry)
    }

    /// Add a carrier. Names must be unique.
    pub fn register(&mut self, provider: Arc<dyn ShippingProvider>) -> DeliveryResult<()> {
        let name = provider.name().to_string();
        if self.providers.contains_key(&name) {
            return Err(DeliveryError::Configuration(format!(
                "shipping provider {name} registered twice"
            )));
        }
        self.providers.insert(name, provider);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ShippingProvider>> {
        self.providers.get(name).cloned()
    }

    /// Like [`get`](Self::get) but a missing carrier is an error.
    pub fn resolve(&self, name: &str) -> DeliveryResult<Arc<dyn ShippingProvider>> {
        self.get(name)
            .ok_or_else(|| DeliveryError::ProviderNotFound(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
