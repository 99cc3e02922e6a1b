//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::{Uuid, Variant};

use crate::error::{DomainError, DomainResult};

/// Identifier of a delivery aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(Uuid);

/// Carrier-side tracking identifier, allocated when a label is created.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingId(Uuid);

/// Parse a hyphenated RFC 4122 UUID (versions 1-5), the only shape accepted
/// from external input.
fn parse_uuid_token(s: &str, name: &str) -> DomainResult<Uuid> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DomainError::invalid_id(format!("{name} cannot be empty")));
    }
    let uuid = Uuid::try_parse(s).map_err(|e| DomainError::invalid_id(format!("{name}: {e}")))?;
    let hyphenated = s.len() == 36;
    let version_ok = (1..=5).contains(&uuid.get_version_num());
    if !hyphenated || !version_ok || uuid.get_variant() != Variant::RFC4122 {
        return Err(DomainError::invalid_id(format!("{name}: invalid UUID format")));
    }
    Ok(uuid)
}

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_uuid_token(s, $name).map(Self)
            }
        }
    };
}

impl_uuid_newtype!(DeliveryId, "DeliveryId");
impl_uuid_newtype!(TrackingId, "TrackingId");

/// Identifier of the order a delivery fulfils (opaque, caller-supplied).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

/// Identifier of a line item inside a shipment (opaque, caller-supplied).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

macro_rules! impl_string_newtype {
    ($t:ident, $name:literal) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> DomainResult<Self> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::validation(concat!($name, " cannot be empty")));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_string_newtype!(OrderId, "OrderId");
impl_string_newtype!(ItemId, "ItemId");
