//! Infrastructure layer: carrier adapters, storage, use cases, scheduling, config.

pub mod config;
pub mod providers;
pub mod repository;
pub mod scheduler;
pub mod status_service;
pub mod usecases;

pub use config::{AppConfig, PollingConfig};
pub use providers::{NrwShippingProvider, TlsShippingProvider};
pub use repository::InMemoryDeliveryRepository;
pub use scheduler::DeliveryPollingTask;
pub use status_service::{DeliveryStatusService, PollSummary};

#[cfg(feature = "postgres")]
pub use repository::postgres::{Database, PostgresDeliveryRepository};
