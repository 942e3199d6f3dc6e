//! Currency codes and currency definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Largest exponent a currency may declare.
pub const MAX_EXPONENT: u32 = 30;

/// Three-letter currency identifier, normalised to upper case.
///
/// ISO-4217 shaped but not restricted to ISO entries (`XBT` is valid).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Parses and normalises a code. Rejects anything but three ASCII letters.
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let code = code.trim();
        match code.as_bytes() {
            [a, b, c] if [a, b, c].iter().all(|ch| ch.is_ascii_alphabetic()) => Ok(Self([
                a.to_ascii_uppercase(),
                b.to_ascii_uppercase(),
                c.to_ascii_uppercase(),
            ])),
            _ => Err(DomainError::InvalidCurrency(format!(
                "`{}` is not a three-letter currency code",
                code
            ))),
        }
    }

    /// Builds a code from a known-good upper-case literal.
    pub(crate) const fn from_static(code: &[u8; 3]) -> Self {
        Self(*code)
    }

    pub fn as_str(&self) -> &str {
        // Only ever built from ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

/// A registered currency: code, minor-unit exponent and display style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    code: CurrencyCode,
    exponent: u32,
    symbol: String,
    grouping_separator: char,
    decimal_separator: char,
}

impl Currency {
    /// Creates a currency with `,` grouping and `.` decimal separators.
    pub fn new(code: CurrencyCode, exponent: u32, symbol: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_separators(code, exponent, symbol, ',', '.')
    }

    /// Creates a currency with an explicit separator pair.
    pub fn with_separators(
        code: CurrencyCode,
        exponent: u32,
        symbol: impl Into<String>,
        grouping_separator: char,
        decimal_separator: char,
    ) -> Result<Self, DomainError> {
        if exponent > MAX_EXPONENT {
            return Err(DomainError::InvalidCurrency(format!(
                "{} exponent {} exceeds {}",
                code, exponent, MAX_EXPONENT
            )));
        }
        if grouping_separator == decimal_separator {
            return Err(DomainError::InvalidCurrency(format!(
                "{} uses `{}` for both grouping and decimals",
                code, grouping_separator
            )));
        }
        if grouping_separator.is_ascii_digit() || decimal_separator.is_ascii_digit() {
            return Err(DomainError::InvalidCurrency(format!(
                "{} separators must not be digits",
                code
            )));
        }
        let symbol = symbol.into();
        if symbol.chars().any(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidCurrency(format!(
                "{} symbol `{}` contains digits",
                code, symbol
            )));
        }
        Ok(Self {
            code,
            exponent,
            symbol,
            grouping_separator,
            decimal_separator,
        })
    }

    pub fn code(&self) -> CurrencyCode {
        self.code
    }

    /// Number of decimal digits in the minor unit.
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn grouping_separator(&self) -> char {
        self.grouping_separator
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
