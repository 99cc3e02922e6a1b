use std::sync::Arc;

use async_trait::async_trait;

use shiptrack_core::{DeliveryId, OrderId, TrackingId};

use crate::delivery::Delivery;
use crate::error::RepositoryError;

/// Persistence port for the `Delivery` aggregate.
///
/// `save` is an upsert keyed by delivery id. Stores must reject a second
/// delivery for an order id that already has one with
/// [`RepositoryError::DuplicateOrder`].
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    async fn save(&self, delivery: &Delivery) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &DeliveryId) -> Result<Option<Delivery>, RepositoryError>;

    async fn find_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<Delivery>, RepositoryError>;

    async fn find_by_tracking_id(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<Option<Delivery>, RepositoryError>;

    /// Deliveries whose status is anything other than delivered.
    async fn find_active(&self) -> Result<Vec<Delivery>, RepositoryError>;
}

#[async_trait]
impl<R> DeliveryRepository for Arc<R>
where
    R: DeliveryRepository + ?Sized,
{
    async fn save(&self, delivery: &Delivery) -> Result<(), RepositoryError> {
        (**self).save(delivery).await
    }

    async fn find_by_id(&self, id: &DeliveryId) -> Result<Option<Delivery>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<Delivery>, RepositoryError> {
        (**self).find_by_order_id(order_id).await
    }

    async fn find_by_tracking_id(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<Option<Delivery>, RepositoryError> {
        (**self).find_by_tracking_id(tracking_id).await
    }

    async fn find_active(&self) -> Result<Vec<Delivery>, RepositoryError> {
        (**self).find_active().await
    }
}
