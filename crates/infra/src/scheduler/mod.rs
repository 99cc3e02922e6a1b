//! Background jobs.

pub mod polling;

pub use polling::DeliveryPollingTask;
