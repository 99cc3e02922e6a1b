use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use shiptrack_core::{AggregateRoot, DeliveryId, OrderId, TrackingId};
use shiptrack_deliveries::{Delivery, DeliveryRepository, RepositoryError};

/// In-memory delivery store for tests/dev.
///
/// The order-id uniqueness check and the insert happen under one write lock,
/// so concurrent creations for the same order cannot both succeed.
#[derive(Debug)]
pub struct InMemoryDeliveryRepository {
    inner: RwLock<HashMap<DeliveryId, Delivery>>,
}

impl InMemoryDeliveryRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(
        &self,
        predicate: impl Fn(&Delivery) -> bool,
    ) -> Result<Option<Delivery>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|d| predicate(d)).cloned())
    }
}

impl Default for InMemoryDeliveryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    async fn save(&self, delivery: &Delivery) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;

        let order_taken = map
            .values()
            .any(|d| d.order_id() == delivery.order_id() && d.id() != delivery.id());
        if order_taken {
            return Err(RepositoryError::DuplicateOrder(delivery.order_id().clone()));
        }

        map.insert(*delivery.id(), delivery.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DeliveryId) -> Result<Option<Delivery>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    async fn find_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<Delivery>, RepositoryError> {
        self.find(|d| d.order_id() == order_id)
    }

    async fn find_by_tracking_id(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<Option<Delivery>, RepositoryError> {
        self.find(|d| d.tracking_id() == tracking_id)
    }

    async fn find_active(&self) -> Result<Vec<Delivery>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut active: Vec<Delivery> = map
            .values()
            .filter(|d| d.status().is_active())
            .cloned()
            .collect();
        active.sort_by_key(|d| d.created_at());
        Ok(active)
    }
}
