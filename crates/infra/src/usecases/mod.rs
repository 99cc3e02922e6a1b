//! Application use cases invoked by the HTTP layer and the scheduler.

pub mod create_delivery;
pub mod get_status;
pub mod poll_status;
pub mod update_status;
pub mod webhook;

pub use create_delivery::{CreateDeliveryCommand, CreateDeliveryUseCase};
pub use get_status::{DeliveryStatusView, GetDeliveryStatusUseCase};
pub use poll_status::PollDeliveryStatusUseCase;
pub use update_status::UpdateDeliveryStatusUseCase;
pub use webhook::{UpdateDeliveryStatusWebhookUseCase, WebhookStatusEvent};
