//! Core types for Order Invoicer: line items, orders, currencies and discounts.

use rust_decimal::Decimal;

pub type OrderId = i64;
pub type Quantity = i64;

/// A money amount or unit price. Always decimal, never binary floating point.
pub type Money = Decimal;

/// Percentage off a pre-discount total. Not bounds-checked.
pub type Percent = Decimal;

/// A record, item or order failed a domain or shape check.
///
/// Scoped to a single record: the batch pipeline skips the record and moves on.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required field '{field}' in order data")]
    MissingField { field: &'static str },

    #[error("{what} must be an object")]
    NotAnObject { what: &'static str },

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("price must be non-negative for item '{item}', got {price}")]
    NegativePrice { item: String, price: Money },

    #[error("quantity must be at least 1 for item '{item}', got {quantity}")]
    InvalidQuantity { item: String, quantity: Quantity },

    #[error("order {order_id} must contain at least one item")]
    EmptyOrder { order_id: OrderId },

    #[error("{what} exceeds the representable money range")]
    AmountOverflow { what: String },
}

pub mod currency;
pub mod discount;
pub mod item;
pub mod order;

pub use currency::Currency;
pub use discount::DiscountTable;
pub use item::PricedItem;
pub use order::Order;
