//! The fixed currency table. Static configuration; nothing here changes at runtime.

use rust_decimal_macros::dec;

use crate::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    /// Conversion rate relative to the base currency.
    pub rate: Money,
    pub symbol: &'static str,
}

const USD: CurrencyInfo = CurrencyInfo { code: "USD", rate: dec!(1.00), symbol: "$" };
const EUR: CurrencyInfo = CurrencyInfo { code: "EUR", rate: dec!(0.85), symbol: "€" };
const GBP: CurrencyInfo = CurrencyInfo { code: "GBP", rate: dec!(0.75), symbol: "£" };

impl Currency {
    pub const BASE: Currency = Currency::Usd;
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];

    pub fn info(self) -> &'static CurrencyInfo {
        match self {
            Currency::Usd => &USD,
            Currency::Eur => &EUR,
            Currency::Gbp => &GBP,
        }
    }

    pub fn code(self) -> &'static str {
        self.info().code
    }

    pub fn rate(self) -> Money {
        self.info().rate
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    /// Exact, case-sensitive lookup in the table.
    pub fn from_code(code: &str) -> Option<Currency> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Resolve a declared code, falling back to the base currency when the
    /// code is absent or unsupported. Never fails.
    pub fn resolve(code: Option<&str>) -> Currency {
        code.and_then(Self::from_code).unwrap_or(Self::BASE)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
