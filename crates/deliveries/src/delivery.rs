use chrono::{DateTime, Utc};

use shiptrack_core::error::require_non_blank;
use shiptrack_core::{AggregateRoot, DeliveryId, DomainResult, OrderId, TrackingId};

use crate::address::Address;
use crate::label::ShippingLabel;
use crate::shipment::ShipmentContent;
use crate::status::DeliveryStatus;

/// Aggregate root: Delivery.
///
/// Owns its shipping label and shipment content. Status and label are the
/// only mutable parts, and only through the methods below.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    id: DeliveryId,
    order_id: OrderId,
    status: DeliveryStatus,
    provider_name: String,
    sender: Address,
    recipient: Address,
    content: ShipmentContent,
    created_at: DateTime<Utc>,
    status_updated_at: DateTime<Utc>,
    last_webhook_at: Option<DateTime<Utc>>,
    shipping_label: ShippingLabel,
}

/// Every persisted field of a delivery, used to rehydrate it from storage.
#[derive(Debug, Clone)]
pub struct DeliveryParts {
    pub id: DeliveryId,
    pub order_id: OrderId,
    pub status: DeliveryStatus,
    pub provider_name: String,
    pub sender: Address,
    pub recipient: Address,
    pub content: ShipmentContent,
    pub created_at: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
    pub last_webhook_at: Option<DateTime<Utc>>,
    pub shipping_label: ShippingLabel,
}

impl Delivery {
    /// Factory for a brand-new delivery: fresh id, status `Created`.
    pub fn create(
        order_id: OrderId,
        provider_name: impl Into<String>,
        shipping_label: ShippingLabel,
        sender: Address,
        recipient: Address,
        content: ShipmentContent,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::from_parts(DeliveryParts {
            id: DeliveryId::new(),
            order_id,
            status: DeliveryStatus::Created,
            provider_name: provider_name.into(),
            sender,
            recipient,
            content,
            created_at: now,
            status_updated_at: now,
            last_webhook_at: None,
            shipping_label,
        })
    }

    /// Rebuild a delivery from persisted state.
    pub fn from_parts(parts: DeliveryParts) -> DomainResult<Self> {
        require_non_blank(&parts.provider_name, "Provider name")?;

        Ok(Self {
            id: parts.id,
            order_id: parts.order_id,
            status: parts.status,
            provider_name: parts.provider_name,
            sender: parts.sender,
            recipient: parts.recipient,
            content: parts.content,
            created_at: parts.created_at,
            status_updated_at: parts.status_updated_at,
            last_webhook_at: parts.last_webhook_at,
            shipping_label: parts.shipping_label,
        })
    }

    pub fn id_typed(&self) -> DeliveryId {
        self.id
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn sender(&self) -> &Address {
        &self.sender
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn content(&self) -> &ShipmentContent {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status_updated_at(&self) -> DateTime<Utc> {
        self.status_updated_at
    }

    /// Event time of the most recent webhook applied to this delivery.
    pub fn last_webhook_at(&self) -> Option<DateTime<Utc>> {
        self.last_webhook_at
    }

    pub fn shipping_label(&self) -> &ShippingLabel {
        &self.shipping_label
    }

    /// Tracking id of the current label; this is what webhook lookups match on.
    pub fn tracking_id(&self) -> &TrackingId {
        self.shipping_label.tracking_id()
    }

    pub fn is_delivered(&self) -> bool {
        self.status == DeliveryStatus::Delivered
    }

    pub fn is_shipped(&self) -> bool {
        self.status == DeliveryStatus::Shipped
    }

    pub fn can_be_shipped(&self) -> bool {
        self.status == DeliveryStatus::Created
    }

    pub fn update_status(&mut self, status: DeliveryStatus, at: DateTime<Utc>) {
        self.status = status;
        self.status_updated_at = at;
    }

    /// Remember that a carrier pushed an update with event time `at`.
    pub fn record_webhook(&mut self, at: DateTime<Utc>) {
        self.last_webhook_at = Some(match self.last_webhook_at {
            Some(previous) if previous > at => previous,
            _ => at,
        });
    }

    /// Swap in a re-issued label (new tracking id included).
    pub fn replace_shipping_label(&mut self, label: ShippingLabel) {
        self.shipping_label = label;
    }
}

impl AggregateRoot for Delivery {
    type Id = DeliveryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
