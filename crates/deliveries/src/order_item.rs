use shiptrack_core::error::{require_non_blank, require_positive};
use shiptrack_core::{DomainError, DomainResult, ItemId, ValueObject};

/// One order line packed into a shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    item_id: ItemId,
    sku: String,
    name: String,
    quantity: u32,
    unit_weight: f64,
}

impl ValueObject for OrderItem {}

impl OrderItem {
    pub fn new(
        item_id: ItemId,
        sku: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        unit_weight: f64,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();

        require_non_blank(&sku, "SKU")?;
        require_non_blank(&name, "Item name")?;
        if quantity == 0 {
            return Err(DomainError::validation("Quantity must be a positive integer"));
        }
        require_positive(unit_weight, "Unit weight")?;

        Ok(Self {
            item_id,
            sku,
            name,
            quantity,
            unit_weight,
        })
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_weight(&self) -> f64 {
        self.unit_weight
    }

    pub fn total_weight(&self) -> f64 {
        f64::from(self.quantity) * self.unit_weight
    }
}
