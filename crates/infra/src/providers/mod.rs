//! Carrier adapters.
//!
//! Both carriers are simulated in-process; neither talks to a real network.

pub mod nrw;
pub mod tls;

pub use nrw::NrwShippingProvider;
pub use tls::TlsShippingProvider;
