use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use shiptrack_core::{AggregateRoot, DomainError, DomainResult, ItemId, OrderId, TrackingId};
use shiptrack_deliveries::{
    Address, Delivery, DeliveryStatus, Dimensions, OrderItem, PackagingType, ShipmentContent,
};
use shiptrack_infra::usecases::{CreateDeliveryCommand, DeliveryStatusView, WebhookStatusEvent};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryRequest {
    pub order_id: String,
    pub sender: AddressRequest,
    pub recipient: AddressRequest,
    pub packaging_type: String,
    pub dimensions: DimensionsRequest,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

#[derive(Debug, Deserialize)]
pub struct DimensionsRequest {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
    pub unit_weight: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStatusRequest {
    pub tracking_id: String,
    pub status: DeliveryStatus,
    pub timestamp: DateTime<Utc>,
}

impl AddressRequest {
    fn into_domain(self) -> DomainResult<Address> {
        Address::new(self.street, self.city, self.state, self.country, self.zip_code)
    }
}

impl CreateDeliveryRequest {
    /// Build validated domain values. Items become
    /// `item-{orderId}-{index}` / sku `productId` / name `Product {productId}`.
    pub fn into_command(self) -> DomainResult<CreateDeliveryCommand> {
        let order_id = OrderId::new(self.order_id)?;

        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let quantity = u32::try_from(item.quantity)
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or_else(|| DomainError::validation("Quantity must be a positive integer"))?;
                OrderItem::new(
                    ItemId::new(format!("item-{order_id}-{index}"))?,
                    item.product_id.clone(),
                    format!("Product {}", item.product_id),
                    quantity,
                    item.unit_weight,
                )
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let dims = self.dimensions;
        let content = ShipmentContent::new(
            items,
            self.packaging_type.parse::<PackagingType>()?,
            Dimensions::new(dims.length, dims.width, dims.height, dims.weight)?,
        )?;

        Ok(CreateDeliveryCommand {
            order_id,
            sender: self.sender.into_domain()?,
            recipient: self.recipient.into_domain()?,
            content,
        })
    }
}

impl WebhookStatusRequest {
    pub fn into_event(self) -> DomainResult<WebhookStatusEvent> {
        Ok(WebhookStatusEvent {
            tracking_id: self.tracking_id.parse::<TrackingId>()?,
            status: self.status,
            timestamp: self.timestamp,
        })
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryResponse {
    pub delivery_id: String,
    pub shipping_label: ShippingLabelResponse,
    pub status: DeliveryStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLabelResponse {
    pub provider: String,
    pub tracking_number: String,
    /// Carries the label text itself.
    pub label_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatusResponse {
    pub delivery_id: String,
    pub status: DeliveryStatus,
    pub last_updated: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
}

impl From<&Delivery> for CreateDeliveryResponse {
    fn from(d: &Delivery) -> Self {
        let label = d.shipping_label();
        Self {
            delivery_id: d.id().to_string(),
            shipping_label: ShippingLabelResponse {
                provider: d.provider_name().to_string(),
                tracking_number: label.tracking_id().to_string(),
                label_url: label.content().to_string(),
            },
            status: d.status(),
        }
    }
}

impl From<DeliveryStatusView> for DeliveryStatusResponse {
    fn from(view: DeliveryStatusView) -> Self {
        Self {
            delivery_id: view.delivery_id.to_string(),
            status: view.status,
            last_updated: view.last_updated.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> CreateDeliveryRequest {
        serde_json::from_value(body).unwrap()
    }

    fn valid_body() -> serde_json::Value {
        let address = json!({
            "street": "Carrer de Balmes 123",
            "city": "Barcelona",
            "state": "Catalonia",
            "country": "Spain",
            "zipCode": "08008"
        });
        json!({
            "orderId": "ORDER-1",
            "sender": address,
            "recipient": address,
            "packagingType": "box",
            "dimensions": { "length": 30, "width": 20, "height": 15, "weight": 2.5 },
            "items": [
                { "productId": "PROD-1", "quantity": 2, "unitWeight": 1.0 },
                { "productId": "PROD-2", "quantity": 1, "unitWeight": 0.5 }
            ]
        })
    }

    #[test]
    fn items_are_named_after_the_order_and_product() {
        let command = request(valid_body()).into_command().unwrap();
        let items = command.content.items();

        assert_eq!(items[0].item_id().as_str(), "item-ORDER-1-0");
        assert_eq!(items[0].sku(), "PROD-1");
        assert_eq!(items[0].name(), "Product PROD-1");
        assert_eq!(items[1].item_id().as_str(), "item-ORDER-1-1");
        assert_eq!(command.content.total_weight(), 2.5);
        assert_eq!(command.content.packaging_type(), PackagingType::Box);
    }

    #[test]
    fn validation_errors_name_the_field() {
        let mut body = valid_body();
        body["recipient"]["city"] = json!("  ");
        let err = request(body).into_command().unwrap_err();
        assert_eq!(err, DomainError::Validation("City is required".into()));

        let mut body = valid_body();
        body["items"][0]["quantity"] = json!(0);
        let err = request(body).into_command().unwrap_err();
        assert_eq!(err, DomainError::Validation("Quantity must be a positive integer".into()));

        let mut body = valid_body();
        body["items"] = json!([]);
        assert!(matches!(request(body).into_command(), Err(DomainError::Validation(_))));

        let mut body = valid_body();
        body["packagingType"] = json!("crate");
        assert!(matches!(request(body).into_command(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn webhook_payload_parses_status_and_timestamp() {
        let tracking = TrackingId::new();
        let payload: WebhookStatusRequest = serde_json::from_value(json!({
            "trackingId": tracking.to_string(),
            "status": "in_transit",
            "timestamp": "2024-03-01T10:15:00.000Z"
        }))
        .unwrap();

        let event = payload.into_event().unwrap();
        assert_eq!(event.tracking_id, tracking);
        assert_eq!(event.status, DeliveryStatus::InTransit);
        assert_eq!(event.timestamp.to_rfc3339(), "2024-03-01T10:15:00+00:00");

        let bad_status = serde_json::from_value::<WebhookStatusRequest>(json!({
            "trackingId": tracking.to_string(),
            "status": "lost",
            "timestamp": "2024-03-01T10:15:00Z"
        }));
        assert!(bad_status.is_err());
    }
}
