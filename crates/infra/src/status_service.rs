//! Delivery status state machine.
//!
//! Two channels feed status changes: the polling sweep (carriers without a
//! push channel) and carrier webhooks. Both end in one persistence step, so
//! the "no write when unchanged" rule lives in a single place.
//!
//! Conflict policy between the channels:
//! - webhooks are only accepted for carriers that push updates, and polling
//!   only queries carriers that do not, so each delivery has one channel;
//! - a webhook event older than the last webhook applied is ignored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use shiptrack_core::{AggregateRoot, Clock, DeliveryId, TrackingId};
use shiptrack_deliveries::{
    Delivery, DeliveryError, DeliveryRepository, DeliveryResult, DeliveryStatus,
    ProviderRegistry,
};

/// Outcome of one sweep over active deliveries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Deliveries whose carrier was asked for a status.
    pub polled: usize,
    /// Active deliveries left alone (webhook carriers, unknown carrier).
    pub skipped: usize,
}

pub struct DeliveryStatusService {
    repository: Arc<dyn DeliveryRepository>,
    providers: ProviderRegistry,
    clock: Arc<dyn Clock>,
}

impl DeliveryStatusService {
    pub fn new(
        repository: Arc<dyn DeliveryRepository>,
        providers: ProviderRegistry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            providers,
            clock,
        }
    }

    /// Set a delivery's status. Persists only when the status actually changes.
    pub async fn update_status(
        &self,
        delivery_id: &DeliveryId,
        status: DeliveryStatus,
    ) -> DeliveryResult<Delivery> {
        let delivery = self.load(delivery_id).await?;
        self.transition(delivery, status, None).await
    }

    /// Ask the delivery's carrier for its status and apply it.
    ///
    /// Carrier failures are logged and swallowed. Webhook carriers are not
    /// queried at all.
    pub async fn poll_one_delivery(&self, delivery_id: &DeliveryId) -> DeliveryResult<()> {
        let delivery = self.load(delivery_id).await?;
        let provider = self.providers.resolve(delivery.provider_name())?;

        if provider.supports_webhooks() {
            debug!(
                delivery_id = %delivery_id,
                provider = provider.name(),
                "webhook carrier, not polling"
            );
            return Ok(());
        }

        match provider.get_delivery_status(delivery.tracking_id()).await {
            Ok(status) => {
                self.transition(delivery, status, None).await?;
            }
            Err(err) => {
                warn!(
                    delivery_id = %delivery_id,
                    provider = provider.name(),
                    error = %err,
                    "failed to poll delivery status"
                );
            }
        }
        Ok(())
    }

    /// One sweep: poll every active delivery whose carrier must be polled.
    pub async fn poll_all_active(&self) -> DeliveryResult<PollSummary> {
        let active = self.repository.find_active().await?;
        let total = active.len();

        let pollable: Vec<DeliveryId> = active
            .iter()
            .filter(|d| self.is_pollable(d))
            .map(|d| *d.id())
            .collect();

        let summary = PollSummary {
            polled: pollable.len(),
            skipped: total - pollable.len(),
        };
        info!(
            "Polling {} deliveries ({} webhook-based deliveries skipped)",
            summary.polled, summary.skipped
        );

        for delivery_id in &pollable {
            self.poll_one_delivery(delivery_id).await?;
        }
        Ok(summary)
    }

    /// Apply a carrier-pushed status, stamped with the time the update is received.
    pub async fn apply_webhook_update(
        &self,
        tracking_id: &TrackingId,
        status: DeliveryStatus,
    ) -> DeliveryResult<Delivery> {
        self.apply_webhook_event(tracking_id, status, self.clock.now())
            .await
    }

    /// Apply a carrier-pushed status carrying the carrier's event time.
    ///
    /// Events older than the last webhook already applied are ignored and the
    /// stored delivery is returned unchanged. Deliveries handled by a polling
    /// carrier reject the event with `WebhookNotSupported`.
    pub async fn apply_webhook_event(
        &self,
        tracking_id: &TrackingId,
        status: DeliveryStatus,
        occurred_at: DateTime<Utc>,
    ) -> DeliveryResult<Delivery> {
        let delivery = self
            .repository
            .find_by_tracking_id(tracking_id)
            .await?
            .ok_or(DeliveryError::TrackingNotFound(*tracking_id))?;

        let provider = self.providers.resolve(delivery.provider_name())?;
        if !provider.supports_webhooks() {
            warn!(
                delivery_id = %delivery.id(),
                tracking_id = %tracking_id,
                provider = provider.name(),
                "rejecting webhook for a polling carrier"
            );
            return Err(DeliveryError::WebhookNotSupported {
                provider: provider.name().to_string(),
                tracking_id: *tracking_id,
            });
        }

        if let Some(last) = delivery.last_webhook_at() {
            if occurred_at < last {
                info!(
                    delivery_id = %delivery.id(),
                    tracking_id = %tracking_id,
                    status = %status,
                    "ignoring stale webhook event"
                );
                return Ok(delivery);
            }
        }

        self.transition(delivery, status, Some(occurred_at)).await
    }

    fn is_pollable(&self, delivery: &Delivery) -> bool {
        match self.providers.get(delivery.provider_name()) {
            Some(provider) => !provider.supports_webhooks(),
            None => {
                warn!(
                    delivery_id = %delivery.id(),
                    provider = delivery.provider_name(),
                    "no carrier registered for delivery, skipping"
                );
                false
            }
        }
    }

    async fn load(&self, delivery_id: &DeliveryId) -> DeliveryResult<Delivery> {
        self.repository
            .find_by_id(delivery_id)
            .await?
            .ok_or(DeliveryError::DeliveryNotFound(*delivery_id))
    }

    /// The single mutation path. Writes once when the status changes or when
    /// the first webhook for a delivery must be recorded, never otherwise.
    /// A repeated webhook with an unchanged status is a no-op.
    async fn transition(
        &self,
        mut delivery: Delivery,
        status: DeliveryStatus,
        webhook_at: Option<DateTime<Utc>>,
    ) -> DeliveryResult<Delivery> {
        let previous = delivery.status();
        let status_changed = previous != status;
        let first_webhook = webhook_at.is_some() && delivery.last_webhook_at().is_none();

        if !status_changed && !first_webhook {
            debug!(delivery_id = %delivery.id(), status = %status, "status unchanged");
            return Ok(delivery);
        }

        if status_changed {
            delivery.update_status(status, self.clock.now());
        }
        if let Some(at) = webhook_at {
            delivery.record_webhook(at);
        }
        self.repository.save(&delivery).await?;

        if status_changed {
            info!(
                delivery_id = %delivery.id(),
                from = %previous,
                to = %status,
                "delivery status updated"
            );
        }
        Ok(delivery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::in_memory::tests::sample_delivery;
    use crate::repository::InMemoryDeliveryRepository;
    use async_trait::async_trait;
    use chrono::Duration;
    use shiptrack_core::{ManualClock, OrderId};
    use shiptrack_deliveries::{
        Address, ProviderError, RepositoryError, ShipmentContent, ShippingLabel,
        ShippingProvider,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Wraps the in-memory store and counts writes.
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryDeliveryRepository,
        saves: AtomicUsize,
    }

    impl CountingRepository {
        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DeliveryRepository for CountingRepository {
        async fn save(&self, delivery: &Delivery) -> Result<(), RepositoryError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(delivery).await
        }

        async fn find_by_id(&self, id: &DeliveryId) -> Result<Option<Delivery>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_order_id(
            &self,
            order_id: &OrderId,
        ) -> Result<Option<Delivery>, RepositoryError> {
            self.inner.find_by_order_id(order_id).await
        }

        async fn find_by_tracking_id(
            &self,
            tracking_id: &TrackingId,
        ) -> Result<Option<Delivery>, RepositoryError> {
            self.inner.find_by_tracking_id(tracking_id).await
        }

        async fn find_active(&self) -> Result<Vec<Delivery>, RepositoryError> {
            self.inner.find_active().await
        }
    }

    /// Carrier double that answers with a scripted status and counts queries.
    struct ScriptedProvider {
        name: &'static str,
        webhooks: bool,
        answer: Mutex<Result<DeliveryStatus, ProviderError>>,
        queries: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(name: &'static str, webhooks: bool, answer: DeliveryStatus) -> Self {
            Self {
                name,
                webhooks,
                answer: Mutex::new(Ok(answer)),
                queries: AtomicUsize::new(0),
            }
        }

        fn answer(&self, answer: Result<DeliveryStatus, ProviderError>) {
            *self.answer.lock().unwrap() = answer;
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ShippingProvider for ScriptedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn create_shipping_label(
            &self,
            _sender: &Address,
            _recipient: &Address,
            _content: &ShipmentContent,
        ) -> Result<ShippingLabel, ProviderError> {
            Ok(ShippingLabel::new(self.name, TrackingId::new(), Utc::now())?)
        }

        fn supports_webhooks(&self) -> bool {
            self.webhooks
        }

        async fn get_delivery_status(
            &self,
            _tracking_id: &TrackingId,
        ) -> Result<DeliveryStatus, ProviderError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.answer.lock().unwrap().clone()
        }
    }

    struct Fixture {
        repo: Arc<CountingRepository>,
        nrw: Arc<ScriptedProvider>,
        tls: Arc<ScriptedProvider>,
        clock: Arc<ManualClock>,
        service: DeliveryStatusService,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(CountingRepository::default());
        let nrw = Arc::new(ScriptedProvider::new("NRW", false, DeliveryStatus::Shipped));
        let tls = Arc::new(ScriptedProvider::new("TLS", true, DeliveryStatus::Created));
        let clock = Arc::new(ManualClock::starting_now());
        let registry = ProviderRegistry::from_providers([
            nrw.clone() as Arc<dyn ShippingProvider>,
            tls.clone() as Arc<dyn ShippingProvider>,
        ])
        .unwrap();
        let service = DeliveryStatusService::new(repo.clone(), registry, clock.clone());

        Fixture {
            repo,
            nrw,
            tls,
            clock,
            service,
        }
    }

    async fn seed(f: &Fixture, order: &str, provider: &str) -> Delivery {
        let delivery = sample_delivery(order, provider);
        f.repo.inner.save(&delivery).await.unwrap();
        delivery
    }

    #[tokio::test]
    async fn update_status_writes_only_on_change() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "NRW").await;

        f.service.update_status(delivery.id(), DeliveryStatus::Created).await.unwrap();
        assert_eq!(f.repo.saves(), 0);

        f.clock.advance(Duration::minutes(3));
        let updated = f
            .service
            .update_status(delivery.id(), DeliveryStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(f.repo.saves(), 1);
        assert_eq!(updated.status(), DeliveryStatus::Shipped);
        assert_eq!(updated.status_updated_at(), f.clock.now());

        f.service.update_status(delivery.id(), DeliveryStatus::Shipped).await.unwrap();
        assert_eq!(f.repo.saves(), 1);
    }

    #[tokio::test]
    async fn update_status_for_unknown_delivery_is_not_found() {
        let f = fixture();
        let id = DeliveryId::new();
        let err = f.service.update_status(&id, DeliveryStatus::Shipped).await.unwrap_err();
        assert_eq!(err, DeliveryError::DeliveryNotFound(id));
    }

    #[tokio::test]
    async fn polling_a_webhook_carrier_makes_no_calls_and_no_writes() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "TLS").await;

        f.service.poll_one_delivery(delivery.id()).await.unwrap();

        assert_eq!(f.tls.queries(), 0);
        assert_eq!(f.repo.saves(), 0);
    }

    #[tokio::test]
    async fn polling_applies_the_carrier_status() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "NRW").await;

        f.service.poll_one_delivery(delivery.id()).await.unwrap();

        assert_eq!(f.nrw.queries(), 1);
        let stored = f.repo.find_by_id(delivery.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DeliveryStatus::Shipped);
    }

    #[tokio::test]
    async fn carrier_failure_during_poll_is_swallowed() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "NRW").await;
        f.nrw.answer(Err(ProviderError::Unavailable {
            provider: "NRW".into(),
            message: "timeout".into(),
        }));

        f.service.poll_one_delivery(delivery.id()).await.unwrap();

        assert_eq!(f.nrw.queries(), 1);
        assert_eq!(f.repo.saves(), 0);
    }

    #[tokio::test]
    async fn polling_an_unregistered_carrier_is_an_error() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "DHL").await;

        let err = f.service.poll_one_delivery(delivery.id()).await.unwrap_err();
        assert_eq!(err, DeliveryError::ProviderNotFound("DHL".into()));
    }

    #[tokio::test]
    async fn sweep_queries_each_polling_delivery_exactly_once() {
        let f = fixture();
        seed(&f, "ORDER-1", "NRW").await;
        seed(&f, "ORDER-2", "NRW").await;
        seed(&f, "ORDER-3", "TLS").await;
        seed(&f, "ORDER-4", "TLS").await;
        seed(&f, "ORDER-5", "TLS").await;
        let mut done = sample_delivery("ORDER-6", "NRW");
        done.update_status(DeliveryStatus::Delivered, Utc::now());
        f.repo.inner.save(&done).await.unwrap();

        let summary = f.service.poll_all_active().await.unwrap();

        assert_eq!(summary, PollSummary { polled: 2, skipped: 3 });
        assert_eq!(f.nrw.queries(), 2);
        assert_eq!(f.tls.queries(), 0);
        assert_eq!(f.repo.saves(), 2);
    }

    #[tokio::test]
    async fn one_failing_carrier_call_does_not_abort_the_sweep() {
        let f = fixture();
        seed(&f, "ORDER-1", "NRW").await;
        seed(&f, "ORDER-2", "NRW").await;
        f.nrw.answer(Err(ProviderError::UnknownTrackingId {
            provider: "NRW".into(),
            tracking_id: TrackingId::new(),
        }));

        let summary = f.service.poll_all_active().await.unwrap();

        assert_eq!(summary.polled, 2);
        assert_eq!(f.nrw.queries(), 2);
    }

    #[tokio::test]
    async fn webhook_update_resolves_by_tracking_id() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "TLS").await;

        let updated = f
            .service
            .apply_webhook_update(delivery.tracking_id(), DeliveryStatus::Shipped)
            .await
            .unwrap();

        assert_eq!(updated.status(), DeliveryStatus::Shipped);
        assert_eq!(updated.last_webhook_at(), Some(f.clock.now()));
        assert_eq!(f.repo.saves(), 1);

        let missing = TrackingId::new();
        let err = f
            .service
            .apply_webhook_update(&missing, DeliveryStatus::Shipped)
            .await
            .unwrap_err();
        assert_eq!(err, DeliveryError::TrackingNotFound(missing));
    }

    #[tokio::test]
    async fn stale_webhook_events_are_ignored() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "TLS").await;
        let t0 = f.clock.now();

        f.service
            .apply_webhook_event(delivery.tracking_id(), DeliveryStatus::InTransit, t0)
            .await
            .unwrap();
        let after = f
            .service
            .apply_webhook_event(
                delivery.tracking_id(),
                DeliveryStatus::Shipped,
                t0 - Duration::minutes(2),
            )
            .await
            .unwrap();

        assert_eq!(after.status(), DeliveryStatus::InTransit);
        assert_eq!(f.repo.saves(), 1);
    }

    #[tokio::test]
    async fn webhook_for_a_polling_carrier_is_rejected_and_polling_continues() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "NRW").await;

        let err = f
            .service
            .apply_webhook_update(delivery.tracking_id(), DeliveryStatus::Shipped)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DeliveryError::WebhookNotSupported {
                provider: "NRW".into(),
                tracking_id: *delivery.tracking_id(),
            }
        );
        assert_eq!(f.repo.saves(), 0);

        f.clock.advance(Duration::hours(5));
        f.nrw.answer(Ok(DeliveryStatus::Delivered));
        let summary = f.service.poll_all_active().await.unwrap();

        assert_eq!(summary, PollSummary { polled: 1, skipped: 0 });
        let stored = f.repo.find_by_id(delivery.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DeliveryStatus::Delivered);
        assert_eq!(stored.last_webhook_at(), None);
    }

    #[tokio::test]
    async fn polling_still_applies_to_a_delivery_with_an_earlier_webhook() {
        let f = fixture();
        let mut delivery = sample_delivery("ORDER-1", "NRW");
        delivery.record_webhook(f.clock.now());
        f.repo.inner.save(&delivery).await.unwrap();

        f.clock.advance(Duration::hours(1));
        f.service.poll_one_delivery(delivery.id()).await.unwrap();

        assert_eq!(f.nrw.queries(), 1);
        let stored = f.repo.find_by_id(delivery.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DeliveryStatus::Shipped);
    }

    #[tokio::test]
    async fn redelivered_webhook_with_the_same_status_does_not_write() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "TLS").await;

        f.service
            .apply_webhook_update(delivery.tracking_id(), DeliveryStatus::Shipped)
            .await
            .unwrap();
        f.clock.advance(Duration::minutes(1));
        let again = f
            .service
            .apply_webhook_update(delivery.tracking_id(), DeliveryStatus::Shipped)
            .await
            .unwrap();

        assert_eq!(again.status(), DeliveryStatus::Shipped);
        assert_eq!(f.repo.saves(), 1);
    }

    #[tokio::test]
    async fn first_webhook_is_recorded_even_without_a_status_change() {
        let f = fixture();
        let delivery = seed(&f, "ORDER-1", "TLS").await;

        let updated = f
            .service
            .apply_webhook_update(delivery.tracking_id(), DeliveryStatus::Created)
            .await
            .unwrap();

        assert_eq!(updated.last_webhook_at(), Some(f.clock.now()));
        assert_eq!(f.repo.saves(), 1);
    }
}
