use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::Percent;

/// Discount code to percentage, supplied per batch run.
///
/// Owned by the batch, never by an order; orders borrow it when computing
/// totals. Percentages pass through unchecked, so a negative entry is a
/// surcharge and anything above 100 drives the total negative.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DiscountTable(HashMap<String, Percent>);

impl DiscountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage for `code`; zero when the code is absent or unknown.
    pub fn percentage(&self, code: Option<&str>) -> Percent {
        code.and_then(|c| self.0.get(c).copied())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Percent)> for DiscountTable {
    fn from_iter<I: IntoIterator<Item = (K, Percent)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
