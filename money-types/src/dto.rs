//! Data crossing the crate boundary: parser inputs and registry configuration.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::Money;

// ─────────────────────────────────────────────────────────────────────────────
// Parser input
// ─────────────────────────────────────────────────────────────────────────────

/// Every kind of value a caller may hand to the parser.
///
/// `Other` stands for anything that is not a monetary value at all and always
/// fails with `DomainError::InvalidInput`.
#[derive(Debug, Clone, PartialEq)]
pub enum MoneyInput {
    /// Whole number; minor units unless decimals are forced.
    Integer(BigInt),
    /// Binary floating point in major units.
    Float(f64),
    /// Free text: decimal numerals, optionally with a currency symbol or code.
    Text(String),
    /// An already constructed amount.
    Money(Money),
    /// Absence of a value.
    Null,
    /// Unsupported value, carrying a description of what it was.
    Other(String),
}

impl From<i64> for MoneyInput {
    fn from(value: i64) -> Self {
        MoneyInput::Integer(BigInt::from(value))
    }
}

impl From<i32> for MoneyInput {
    fn from(value: i32) -> Self {
        MoneyInput::Integer(BigInt::from(value))
    }
}

impl From<BigInt> for MoneyInput {
    fn from(value: BigInt) -> Self {
        MoneyInput::Integer(value)
    }
}

impl From<f64> for MoneyInput {
    fn from(value: f64) -> Self {
        MoneyInput::Float(value)
    }
}

impl From<&str> for MoneyInput {
    fn from(value: &str) -> Self {
        MoneyInput::Text(value.to_string())
    }
}

impl From<String> for MoneyInput {
    fn from(value: String) -> Self {
        MoneyInput::Text(value)
    }
}

impl From<Money> for MoneyInput {
    fn from(value: Money) -> Self {
        MoneyInput::Money(value)
    }
}

impl<T: Into<MoneyInput>> From<Option<T>> for MoneyInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(MoneyInput::Null, Into::into)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry configuration
// ─────────────────────────────────────────────────────────────────────────────

/// One currency entry in the registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub exponent: u32,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping_separator: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_separator: Option<char>,
}

/// Registry configuration: currencies by code plus optional parser symbol overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub currencies: BTreeMap<String, CurrencyConfig>,
    /// Symbol → code entries layered over the standard symbol table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub symbols: BTreeMap<String, String>,
}
