//! Service wiring: carriers, status service, use cases and the polling task
//! over whichever delivery store the binary picked.

use std::sync::Arc;

use shiptrack_core::Clock;
use shiptrack_deliveries::{
    DeliveryRepository, DeliveryResult, ProviderRegistry, ProviderSelectionService,
    ShippingProvider,
};
use shiptrack_infra::usecases::{
    CreateDeliveryUseCase, GetDeliveryStatusUseCase, PollDeliveryStatusUseCase,
    UpdateDeliveryStatusWebhookUseCase,
};
use shiptrack_infra::{
    DeliveryPollingTask, DeliveryStatusService, NrwShippingProvider, TlsShippingProvider,
};

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub create_delivery: CreateDeliveryUseCase,
    pub get_delivery_status: GetDeliveryStatusUseCase,
    pub webhook_status: UpdateDeliveryStatusWebhookUseCase,
    pub polling: DeliveryPollingTask,
}

/// Register the two carriers, both reading time from `clock`.
pub fn carrier_registry(clock: Arc<dyn Clock>) -> DeliveryResult<ProviderRegistry> {
    ProviderRegistry::from_providers([
        Arc::new(NrwShippingProvider::new(clock.clone())) as Arc<dyn ShippingProvider>,
        Arc::new(TlsShippingProvider::new(clock)),
    ])
}

pub fn build_services(
    repository: Arc<dyn DeliveryRepository>,
    clock: Arc<dyn Clock>,
) -> DeliveryResult<AppServices> {
    let registry = carrier_registry(clock.clone())?;

    let status_service = Arc::new(DeliveryStatusService::new(
        repository.clone(),
        registry.clone(),
        clock.clone(),
    ));
    let poll = Arc::new(PollDeliveryStatusUseCase::new(status_service.clone()));

    Ok(AppServices {
        create_delivery: CreateDeliveryUseCase::new(
            repository.clone(),
            ProviderSelectionService::new(registry)?,
            clock.clone(),
        ),
        get_delivery_status: GetDeliveryStatusUseCase::new(repository, clock),
        webhook_status: UpdateDeliveryStatusWebhookUseCase::new(status_service),
        polling: DeliveryPollingTask::new(poll),
    })
}
