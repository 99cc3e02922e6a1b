use core::str::FromStr;

use serde::{Deserialize, Serialize};
use shiptrack_core::DomainError;

/// Delivery lifecycle status.
///
/// Canonical progression is `Created -> Shipped -> InTransit -> Delivered`;
/// `Failed` can be pushed by a carrier webhook from any state. Transitions are
/// not enforced: whatever a channel reports is applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Created,
    Shipped,
    InTransit,
    Delivered,
    Failed,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 5] = [
        DeliveryStatus::Created,
        DeliveryStatus::Shipped,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
        DeliveryStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Created => "created",
            DeliveryStatus::Shipped => "shipped",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Failed => "failed",
        }
    }

    /// Every status except `Delivered` still needs tracking.
    pub fn is_active(&self) -> bool {
        *self != DeliveryStatus::Delivered
    }
}

impl core::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown delivery status '{s}' (expected one of: created, shipped, in_transit, delivered, failed)"
                ))
            })
    }
}
