use std::sync::Arc;

use tracing::{info, instrument};

use shiptrack_core::{AggregateRoot, Clock, OrderId};
use shiptrack_deliveries::{
    Address, Delivery, DeliveryError, DeliveryRepository, DeliveryResult,
    ProviderSelectionService, ShipmentContent,
};

/// Input of [`CreateDeliveryUseCase::execute`], already validated.
#[derive(Debug, Clone)]
pub struct CreateDeliveryCommand {
    pub order_id: OrderId,
    pub sender: Address,
    pub recipient: Address,
    pub content: ShipmentContent,
}

/// Registers a new delivery for an order.
///
/// 1. Reject an order that already has a delivery (before any carrier call)
/// 2. Pick the carrier by parcel weight
/// 3. Obtain a label from it
/// 4. Persist the new delivery
///
/// A carrier failure in step 3 leaves nothing persisted.
pub struct CreateDeliveryUseCase {
    repository: Arc<dyn DeliveryRepository>,
    selection: ProviderSelectionService,
    clock: Arc<dyn Clock>,
}

impl CreateDeliveryUseCase {
    pub fn new(
        repository: Arc<dyn DeliveryRepository>,
        selection: ProviderSelectionService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            selection,
            clock,
        }
    }

    #[instrument(skip(self, command), fields(order_id = %command.order_id), err)]
    pub async fn execute(&self, command: CreateDeliveryCommand) -> DeliveryResult<Delivery> {
        let CreateDeliveryCommand {
            order_id,
            sender,
            recipient,
            content,
        } = command;

        if self.repository.find_by_order_id(&order_id).await?.is_some() {
            return Err(DeliveryError::DuplicateOrder(order_id));
        }

        let provider = self.selection.select_provider(content.dimensions())?;
        let label = provider
            .create_shipping_label(&sender, &recipient, &content)
            .await?;

        let delivery = Delivery::create(
            order_id,
            provider.name(),
            label,
            sender,
            recipient,
            content,
            self.clock.now(),
        )?;
        self.repository.save(&delivery).await?;

        info!(
            delivery_id = %delivery.id(),
            provider = delivery.provider_name(),
            tracking_id = %delivery.tracking_id(),
            "delivery created"
        );
        Ok(delivery)
    }
}
