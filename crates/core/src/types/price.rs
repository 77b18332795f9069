//! Type-safe price representation using decimal arithmetic.
//!
//! Every money amount the cart surfaces paint goes through [`Price`], so the
//! `R$ 1234,50` rule (symbol, space, two places, comma separator) lives in one
//! place instead of being repeated per view.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in Brazilian reais.
    #[must_use]
    pub const fn brl(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::BRL)
    }

    /// Format for display, e.g. `R$ 1234,50`.
    ///
    /// Rounds half away from zero to two places. No thousands grouping is
    /// applied.
    #[must_use]
    pub fn display(&self) -> String {
        let mut rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);

        let digits = rounded
            .to_string()
            .replace('.', &self.currency_code.decimal_separator().to_string());

        format!("{} {digits}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BRL => "R$",
        }
    }

    /// Separator between the integer and fractional parts.
    #[must_use]
    pub const fn decimal_separator(self) -> char {
        match self {
            Self::BRL => ',',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brl_display_pads_to_two_places() {
        assert_eq!(Price::brl(Decimal::new(12345, 1)).display(), "R$ 1234,50");
    }

    #[test]
    fn test_brl_display_zero() {
        assert_eq!(Price::brl(Decimal::ZERO).display(), "R$ 0,00");
    }

    #[test]
    fn test_brl_display_rounds_half_away_from_zero() {
        // 15.905 -> 15,91
        assert_eq!(Price::brl(Decimal::new(15905, 3)).to_string(), "R$ 15,91");
        // 7.004 -> 7,00
        assert_eq!(Price::brl(Decimal::new(7004, 3)).to_string(), "R$ 7,00");
    }

    #[test]
    fn test_brl_display_has_no_grouping() {
        assert_eq!(
            Price::brl(Decimal::new(123_456_789, 2)).display(),
            "R$ 1234567,89"
        );
    }
}
