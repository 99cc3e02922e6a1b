use chrono::{DateTime, SecondsFormat, Utc};
use shiptrack_core::error::require_non_blank;
use shiptrack_core::{DomainResult, TrackingId, ValueObject};

use crate::address::Address;
use crate::shipment::ShipmentContent;

/// Carrier-issued shipping label.
///
/// `content` is opaque, provider-formatted text meant for display only;
/// structured data (tracking id, addresses, weight) lives on the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingLabel {
    content: String,
    tracking_id: TrackingId,
    generated_at: DateTime<Utc>,
}

impl ValueObject for ShippingLabel {}

impl ShippingLabel {
    pub fn new(
        content: impl Into<String>,
        tracking_id: TrackingId,
        generated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let content = content.into();
        require_non_blank(&content, "Shipping label content")?;
        Ok(Self {
            content,
            tracking_id,
            generated_at,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tracking_id(&self) -> &TrackingId {
        &self.tracking_id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Render the label text a carrier prints for a parcel.
    pub fn render_content(
        provider_name: &str,
        tracking_id: &TrackingId,
        sender: &Address,
        recipient: &Address,
        content: &ShipmentContent,
    ) -> String {
        format!(
            "{provider_name} Shipping Label\nTracking: {tracking_id}\nFrom: {}\nTo: {}\nPackaging: {}\nWeight: {}kg\nDimensions: {}",
            sender.full_address(),
            recipient.full_address(),
            content.packaging_type(),
            content.total_weight(),
            content.dimensions(),
        )
    }
}

impl core::fmt::Display for ShippingLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}\nTracking ID: {}\nGenerated: {}",
            self.content,
            self.tracking_id,
            self.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}
