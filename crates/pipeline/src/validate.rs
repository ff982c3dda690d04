//! Record validation and entity construction.
//!
//! Records arrive loosely typed from the decoder, so every field is checked
//! here even though the decoder is expected to have produced the right shape.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use oi_core::{Money, Order, PricedItem, ValidationError};

/// One undecoded order record, as it came out of the source.
pub type RawRecord = Value;

/// Checked in this order; the first absent one is reported.
pub const REQUIRED_FIELDS: [&str; 3] = ["order_id", "customer", "items"];

/// Fails if the record is not an object or lacks a required field.
pub fn validate(record: &RawRecord) -> Result<&Map<String, Value>, ValidationError> {
    let fields = record
        .as_object()
        .ok_or(ValidationError::NotAnObject { what: "order record" })?;
    for field in REQUIRED_FIELDS {
        if !fields.contains_key(field) {
            return Err(ValidationError::MissingField { field });
        }
    }
    Ok(fields)
}

/// Validate a record, then build its items and the order.
pub fn build_order(record: &RawRecord) -> Result<Order, ValidationError> {
    let fields = validate(record)?;

    let order_id = fields["order_id"]
        .as_i64()
        .ok_or_else(|| invalid("order_id", expected("an integer", &fields["order_id"])))?;
    let customer = fields["customer"]
        .as_str()
        .ok_or_else(|| invalid("customer", expected("text", &fields["customer"])))?;
    let items = fields["items"]
        .as_array()
        .ok_or_else(|| invalid("items", expected("a list", &fields["items"])))?
        .iter()
        .map(build_item)
        .collect::<Result<Vec<_>, _>>()?;

    let discount_code = match fields.get("discount_code") {
        None | Some(Value::Null) => None,
        Some(Value::String(code)) => Some(code.clone()),
        Some(other) => return Err(invalid("discount_code", expected("text", other))),
    };
    // Anything other than a supported code string falls back to the base currency.
    let currency = fields.get("currency").and_then(Value::as_str);

    Order::new(order_id, customer, items, discount_code, currency)
}

fn build_item(value: &Value) -> Result<PricedItem, ValidationError> {
    let fields = value
        .as_object()
        .ok_or(ValidationError::NotAnObject { what: "item" })?;
    let field = |name: &'static str| {
        fields
            .get(name)
            .ok_or(ValidationError::MissingField { field: name })
    };

    let name = field("name")?;
    let name = name
        .as_str()
        .ok_or_else(|| invalid("name", expected("text", name)))?;
    let price = match field("price")? {
        Value::Number(n) => decimal("price", n)?,
        other => return Err(invalid("price", expected("a number", other))),
    };
    let quantity = field("quantity")?;
    let quantity = quantity
        .as_i64()
        .ok_or_else(|| invalid("quantity", expected("an integer", quantity)))?;

    PricedItem::new(name, price, quantity)
}

fn decimal(field: &'static str, n: &Number) -> Result<Money, ValidationError> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| invalid(field, format!("{text} is not a representable decimal: {e}")))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField { field, reason: reason.into() }
}

fn expected(what: &str, got: &Value) -> String {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    };
    format!("expected {what}, got {kind}")
}
