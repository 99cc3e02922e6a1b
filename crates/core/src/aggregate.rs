//! Aggregate root trait for domain models that own their consistency boundary.

/// Aggregate root marker + minimal interface.
///
/// Aggregates are loaded and saved as a whole; everything they own (labels,
/// shipment content) is only reachable through the root.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;
}
