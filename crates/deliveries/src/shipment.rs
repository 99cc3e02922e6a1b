use core::str::FromStr;

use serde::{Deserialize, Serialize};
use shiptrack_core::{DomainError, DomainResult, ValueObject};

use crate::dimensions::Dimensions;
use crate::order_item::OrderItem;

/// Packaging used for a shipment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingType {
    Box,
    Envelope,
}

impl PackagingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackagingType::Box => "box",
            PackagingType::Envelope => "envelope",
        }
    }
}

impl core::fmt::Display for PackagingType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackagingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "box" => Ok(PackagingType::Box),
            "envelope" => Ok(PackagingType::Envelope),
            _ => Err(DomainError::validation(
                "Packaging type must be one of: box, envelope",
            )),
        }
    }
}

/// What is inside a parcel: the items, how they are packed, and the
/// measured package.
#[derive(Debug, Clone)]
pub struct ShipmentContent {
    items: Vec<OrderItem>,
    packaging_type: PackagingType,
    dimensions: Dimensions,
}

impl ValueObject for ShipmentContent {}

impl ShipmentContent {
    pub fn new(
        items: Vec<OrderItem>,
        packaging_type: PackagingType,
        dimensions: Dimensions,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "Shipment content must have at least one item",
            ));
        }

        Ok(Self {
            items,
            packaging_type,
            dimensions,
        })
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn packaging_type(&self) -> PackagingType {
        self.packaging_type
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Sum of every item's `quantity * unit_weight`.
    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(OrderItem::total_weight).sum()
    }

    fn sorted_items(&self) -> Vec<&OrderItem> {
        let mut items: Vec<&OrderItem> = self.items.iter().collect();
        items.sort_by(|a, b| a.item_id().cmp(b.item_id()));
        items
    }
}

/// Item order is irrelevant; items are compared after sorting by id.
impl PartialEq for ShipmentContent {
    fn eq(&self, other: &Self) -> bool {
        self.packaging_type == other.packaging_type
            && self.dimensions == other.dimensions
            && self.items.len() == other.items.len()
            && self.sorted_items() == other.sorted_items()
    }
}
