//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable**, **self-validating** and **compared by value**.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two addresses with the same fields are equal)
/// - **Entity**: Has identity (two deliveries with the same id are the same delivery)
///
/// ## Construction
///
/// Constructors validate every field and return `DomainResult<Self>`; a value
/// object is either fully valid or never built. To "modify" one, build a new one.
///
/// ```ignore
/// let a = Address::new("Carrer de Balmes 1", "Barcelona", "Catalonia", "Spain", "08008")?;
/// let b = Address::new("Carrer de Balmes 1", "Barcelona", "Catalonia", "Spain", "08008")?;
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
