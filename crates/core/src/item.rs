use tracing::debug;

use crate::{Money, Quantity, ValidationError};

/// One line of an order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem {
    name: String,
    price: Money,
    quantity: Quantity,
}

impl PricedItem {
    /// Fails when the price is negative, the quantity is below one, or the
    /// line total does not fit in a `Money`.
    pub fn new(name: impl Into<String>, price: Money, quantity: Quantity) -> Result<Self, ValidationError> {
        let name = name.into();
        if price < Money::ZERO {
            return Err(ValidationError::NegativePrice { item: name, price });
        }
        if quantity < 1 {
            return Err(ValidationError::InvalidQuantity { item: name, quantity });
        }
        let item = Self { name, price, quantity };
        if item.checked_total().is_none() {
            return Err(ValidationError::AmountOverflow {
                what: format!("line total of item '{}'", item.name),
            });
        }
        debug!(?item, "item created");
        Ok(item)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Line total: unit price × quantity.
    pub fn total_price(&self) -> Money {
        // Construction already proved this product fits.
        self.price * Money::from(self.quantity)
    }

    pub(crate) fn checked_total(&self) -> Option<Money> {
        self.price.checked_mul(Money::from(self.quantity))
    }
}
