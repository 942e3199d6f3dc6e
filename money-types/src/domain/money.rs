//! Exact monetary value with embedded currency.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::domain::currency::{Currency, CurrencyCode};
use crate::domain::format;
use crate::error::DomainError;

/// Exact money representation with embedded currency.
///
/// Amount is stored in the smallest unit of the currency (cents, satoshi, etc.)
/// as an arbitrary-precision integer, so no value is ever rounded through
/// binary floating point. Values are immutable; every operation returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    #[serde(serialize_with = "amount_as_string")]
    amount: BigInt,
    #[serde(serialize_with = "currency_as_code")]
    currency: Arc<Currency>,
}

impl Money {
    /// Creates money from an amount of minor units.
    pub fn from_minor_units(amount: impl Into<BigInt>, currency: Arc<Currency>) -> Self {
        Self {
            amount: amount.into(),
            currency,
        }
    }

    /// Creates a zero-value Money for the given currency.
    pub fn zero(currency: Arc<Currency>) -> Self {
        Self::from_minor_units(BigInt::zero(), currency)
    }

    /// Returns the amount in minor units.
    pub fn amount(&self) -> &BigInt {
        &self.amount
    }

    /// Returns the currency.
    pub fn currency(&self) -> &Arc<Currency> {
        &self.currency
    }

    pub fn currency_code(&self) -> CurrencyCode {
        self.currency.code()
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }

    /// Returns the same amount with the opposite sign.
    pub fn negate(&self) -> Money {
        Money {
            amount: -&self.amount,
            currency: Arc::clone(&self.currency),
        }
    }

    /// Checked addition - returns error if currencies don't match.
    pub fn checked_add(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        Ok(Money {
            amount: &self.amount + &other.amount,
            currency: Arc::clone(&self.currency),
        })
    }

    /// Checked subtraction - returns error if currencies don't match.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        Ok(Money {
            amount: &self.amount - &other.amount,
            currency: Arc::clone(&self.currency),
        })
    }

    /// Orders two amounts of the same currency.
    pub fn checked_cmp(&self, other: &Money) -> Result<Ordering, DomainError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Display string, e.g. `$1,234.56`.
    pub fn format(&self) -> String {
        format::format_money(self)
    }

    /// Plain decimal string in major units, e.g. `1234.56`.
    pub fn to_decimal_string(&self) -> String {
        format::format_decimal(self)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency.code() != other.currency.code() {
            return Err(DomainError::CurrencyMismatch {
                expected: self.currency.code(),
                got: other.currency.code(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

fn amount_as_string<S: Serializer>(amount: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(amount)
}

fn currency_as_code<S: Serializer>(
    currency: &Arc<Currency>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&currency.code())
}
