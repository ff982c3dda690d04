use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};

use crate::{Currency, DiscountTable, Money, OrderId, Percent, PricedItem, ValidationError};

/// A validated order. Totals are derived on every call, never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    order_id: OrderId,
    customer: String,
    items: Vec<PricedItem>,
    discount_code: Option<String>,
    currency: Currency,
}

impl Order {
    /// Builds an order from already-validated items.
    ///
    /// An absent or unsupported `currency` silently resolves to the base
    /// currency. An empty item list, or a total that does not fit in a
    /// `Money`, is rejected.
    pub fn new(
        order_id: OrderId,
        customer: impl Into<String>,
        items: Vec<PricedItem>,
        discount_code: Option<String>,
        currency: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if items.is_empty() {
            return Err(ValidationError::EmptyOrder { order_id });
        }
        let order = Self {
            order_id,
            customer: customer.into(),
            items,
            discount_code,
            currency: Currency::resolve(currency),
        };
        if order.checked_total_before_discount().is_none() {
            return Err(ValidationError::AmountOverflow {
                what: format!("total of order {order_id}"),
            });
        }
        debug!(?order, "order created");
        Ok(order)
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn items(&self) -> &[PricedItem] {
        &self.items
    }

    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code.as_deref()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Sum of line totals converted at the order currency's rate.
    pub fn total_before_discount(&self) -> Money {
        // Construction already proved the sum and conversion fit.
        let subtotal: Money = self.items.iter().map(PricedItem::total_price).sum();
        subtotal * self.currency.rate()
    }

    fn checked_total_before_discount(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.checked_total()?))?
            .checked_mul(self.currency.rate())
    }

    pub fn discount_percentage(&self, discounts: &DiscountTable) -> Percent {
        discounts.percentage(self.discount_code())
    }

    /// Pre-discount total less `pct`% of itself.
    ///
    /// Percentages are unbounded, so an extreme one can push the result out
    /// of range; that is reported as `AmountOverflow` for this order alone.
    pub fn apply_discount(&self, discounts: &DiscountTable) -> Result<Money, ValidationError> {
        let before = self.total_before_discount();
        let percent = self.discount_percentage(discounts);
        let computed = before
            .checked_mul(percent)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|amount| Some((amount, before.checked_sub(amount)?)));
        let Some((amount, after)) = computed else {
            return Err(ValidationError::AmountOverflow {
                what: format!("discounted total of order {}", self.order_id),
            });
        };
        if !amount.is_zero() {
            info!(
                order_id = self.order_id,
                %percent,
                code = self.discount_code().unwrap_or_default(),
                "discount applied"
            );
        }
        Ok(after)
    }

    /// The invoice line for this order. The layout is consumed downstream and
    /// must not change.
    pub fn summary(&self, discounts: &DiscountTable) -> Result<String, ValidationError> {
        let after = self.apply_discount(discounts)?;
        let symbol = self.currency.symbol();
        Ok(format!(
            "Order ID: {} | Customer: {} | Total Before Discount: {}{} | Total After Discount: {}{}",
            self.order_id,
            self.customer,
            symbol,
            two_places(self.total_before_discount()),
            symbol,
            two_places(after),
        ))
    }
}

fn two_places(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("{rounded:.2}")
}
