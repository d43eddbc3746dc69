//! Money type
//!
//! Domain primitive for monetary values held as exact integer minor units
//! (centavos) tagged with a currency. Amounts are validated at construction
//! time and arithmetic is checked, so rounding errors and silent overflow
//! cannot exist in the system.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

/// Currency every account settles in.
pub const HOME_CURRENCY: Currency = Currency::Brl;

/// ISO 4217 currency tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Brl,
    Usd,
}

impl Currency {
    /// ISO 4217 alphabetic code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
        }
    }

    /// Number of minor-unit digits (both supported currencies use 2).
    pub fn exponent(&self) -> u32 {
        match self {
            Currency::Brl => 2,
            Currency::Usd => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Money represents an exact monetary value in minor units.
///
/// # Invariants
/// - The amount is a scaled integer; no fractional minor units exist
/// - Arithmetic between different currencies is rejected, never coerced
/// - Construction from major units refuses values that would round
///
/// # Example
/// ```
/// use peerpay::domain::{Currency, Money};
///
/// let price = Money::from_minor_units(150_00, Currency::Brl);
/// assert_eq!(price.to_string(), "150.00 BRL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    minor_units: i64,
    currency: Currency,
}

/// Errors that can occur when creating or combining Money values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    #[error("Amount has too many decimal places (max {max}, got {got})")]
    TooManyDecimals { max: u32, got: u32 },

    #[error("Amount exceeds the representable range")]
    Overflow,
}

impl Money {
    /// Create Money from a count of minor units (e.g. centavos).
    pub const fn from_minor_units(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Create Money from a major-unit decimal (e.g. "10.50").
    ///
    /// # Errors
    /// - `MoneyError::TooManyDecimals` if the value has more decimal places
    ///   than the currency carries (no rounding, ever)
    /// - `MoneyError::Overflow` if the value does not fit in i64 minor units
    pub fn from_major_units(value: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let exponent = currency.exponent();
        if value.normalize().scale() > exponent {
            return Err(MoneyError::TooManyDecimals {
                max: exponent,
                got: value.normalize().scale(),
            });
        }

        let scaled = value
            .checked_mul(Decimal::from(10_i64.pow(exponent)))
            .ok_or(MoneyError::Overflow)?;
        let minor_units = scaled.to_i64().ok_or(MoneyError::Overflow)?;

        Ok(Self {
            minor_units,
            currency,
        })
    }

    /// The raw minor-unit count.
    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// The currency tag.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// The exact major-unit value (e.g. 1050 centavos -> 10.50).
    pub fn to_major_units(&self) -> Decimal {
        Decimal::new(self.minor_units, self.currency.exponent())
    }

    /// Add two Money values of the same currency.
    ///
    /// # Errors
    /// - `MoneyError::CurrencyMismatch` when the currencies differ
    /// - `MoneyError::Overflow` when the sum leaves the i64 range
    pub fn checked_add(&self, other: Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let minor_units = self
            .minor_units
            .checked_add(other.minor_units)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self {
            minor_units,
            currency: self.currency,
        })
    }

    /// Compare two Money values of the same currency.
    pub fn checked_cmp(&self, other: Money) -> Result<Ordering, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.minor_units.cmp(&other.minor_units))
    }

    /// True when the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    fn ensure_same_currency(&self, other: Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Self {
            minor_units: -self.minor_units,
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_major_units(), self.currency)
    }
}
