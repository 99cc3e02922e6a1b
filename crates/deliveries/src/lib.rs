//! Deliveries domain module.
//!
//! This crate contains the business rules for parcel deliveries: value
//! objects, the `Delivery` aggregate, carrier selection, and the ports
//! (`ShippingProvider`, `DeliveryRepository`) that infrastructure implements.
//! No IO, no HTTP, no storage.

pub mod address;
pub mod delivery;
pub mod dimensions;
pub mod error;
pub mod label;
pub mod order_item;
pub mod provider;
pub mod repository;
pub mod selection;
pub mod shipment;
pub mod status;

pub use address::Address;
pub use delivery::{Delivery, DeliveryParts};
pub use dimensions::Dimensions;
pub use error::{DeliveryError, DeliveryResult, ProviderError, RepositoryError};
pub use label::ShippingLabel;
pub use order_item::OrderItem;
pub use provider::{ProviderRegistry, ShippingProvider};
pub use repository::DeliveryRepository;
pub use selection::ProviderSelectionService;
pub use shipment::{PackagingType, ShipmentContent};
pub use status::DeliveryStatus;
