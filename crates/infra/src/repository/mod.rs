//! `DeliveryRepository` adapters.

pub mod document;
pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use document::DeliveryDocument;
pub use in_memory::InMemoryDeliveryRepository;
