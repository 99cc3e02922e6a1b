//! Storage representation of a delivery.
//!
//! Mirrors the aggregate one to one with nested sub-documents. Loading goes
//! back through the domain constructors, so a stored record that no longer
//! satisfies the value-object rules surfaces as `RepositoryError::Corrupt`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shiptrack_core::{AggregateRoot, DeliveryId, DomainError, ItemId, OrderId, TrackingId};
use shiptrack_deliveries::{
    Address, Delivery, DeliveryParts, DeliveryStatus, Dimensions, OrderItem, PackagingType,
    RepositoryError, ShipmentContent, ShippingLabel,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDocument {
    pub id: DeliveryId,
    pub order_id: OrderId,
    pub status: DeliveryStatus,
    pub provider_name: String,
    pub sender: AddressDocument,
    pub recipient: AddressDocument,
    pub content: ShipmentContentDocument,
    pub shipping_label: ShippingLabelDocument,
    pub created_at: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_webhook_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressDocument {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentContentDocument {
    pub items: Vec<OrderItemDocument>,
    pub packaging_type: PackagingType,
    pub dimensions: DimensionsDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDocument {
    pub item_id: ItemId,
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionsDocument {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingLabelDocument {
    pub content: String,
    pub tracking_id: TrackingId,
    pub generated_at: DateTime<Utc>,
}

impl From<&Address> for AddressDocument {
    fn from(a: &Address) -> Self {
        Self {
            street: a.street().to_string(),
            city: a.city().to_string(),
            state: a.state().to_string(),
            country: a.country().to_string(),
            zip_code: a.zip().to_string(),
        }
    }
}

impl From<&Delivery> for DeliveryDocument {
    fn from(d: &Delivery) -> Self {
        let content = d.content();
        let dims = content.dimensions();
        let label = d.shipping_label();

        Self {
            id: *d.id(),
            order_id: d.order_id().clone(),
            status: d.status(),
            provider_name: d.provider_name().to_string(),
            sender: d.sender().into(),
            recipient: d.recipient().into(),
            content: ShipmentContentDocument {
                items: content
                    .items()
                    .iter()
                    .map(|item| OrderItemDocument {
                        item_id: item.item_id().clone(),
                        sku: item.sku().to_string(),
                        name: item.name().to_string(),
                        quantity: item.quantity(),
                        unit_weight: item.unit_weight(),
                    })
                    .collect(),
                packaging_type: content.packaging_type(),
                dimensions: DimensionsDocument {
                    length: dims.length(),
                    width: dims.width(),
                    height: dims.height(),
                    weight: dims.weight(),
                },
            },
            shipping_label: ShippingLabelDocument {
                content: label.content().to_string(),
                tracking_id: *label.tracking_id(),
                generated_at: label.generated_at(),
            },
            created_at: d.created_at(),
            status_updated_at: d.status_updated_at(),
            last_webhook_at: d.last_webhook_at(),
        }
    }
}

impl AddressDocument {
    fn into_domain(self) -> Result<Address, DomainError> {
        Address::new(self.street, self.city, self.state, self.country, self.zip_code)
    }
}

impl DeliveryDocument {
    pub fn into_delivery(self) -> Result<Delivery, RepositoryError> {
        let id = self.id;
        self.try_into_delivery()
            .map_err(|e| RepositoryError::Corrupt(format!("delivery {id}: {e}")))
    }

    fn try_into_delivery(self) -> Result<Delivery, DomainError> {
        let items = self
            .content
            .items
            .into_iter()
            .map(|i| OrderItem::new(i.item_id, i.sku, i.name, i.quantity, i.unit_weight))
            .collect::<Result<Vec<_>, _>>()?;
        let dims = self.content.dimensions;
        let content = ShipmentContent::new(
            items,
            self.content.packaging_type,
            Dimensions::new(dims.length, dims.width, dims.height, dims.weight)?,
        )?;
        let shipping_label = ShippingLabel::new(
            self.shipping_label.content,
            self.shipping_label.tracking_id,
            self.shipping_label.generated_at,
        )?;

        Delivery::from_parts(DeliveryParts {
            id: self.id,
            order_id: self.order_id,
            status: self.status,
            provider_name: self.provider_name,
            sender: self.sender.into_domain()?,
            recipient: self.recipient.into_domain()?,
            content,
            created_at: self.created_at,
            status_updated_at: self.status_updated_at,
            last_webhook_at: self.last_webhook_at,
            shipping_label,
        })
    }
}
