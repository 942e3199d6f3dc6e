//! Parsing heterogeneous inputs into exact amounts.
//!
//! Input shapes are tried from most to least specific:
//! 1. an existing [`Money`] passes through, integers are minor units
//! 2. text with a currency symbol (or registered code) picks that currency
//! 3. plain decimal text is scaled by the currency exponent, rounding half-up
//! 4. floats go through their shortest decimal representation, never through
//!    multiplication, so `70500.19` is exactly `7050019` minor units
//! 5. null stays null

use num_bigint::BigInt;
use num_traits::One;
use std::sync::Arc;

use crate::domain::currency::{Currency, CurrencyCode};
use crate::domain::money::Money;
use crate::domain::registry::CurrencyRegistry;
use crate::dto::{MoneyInput, RegistryConfig};
use crate::error::DomainError;

const CANONICAL_GROUPING: char = ',';
const CANONICAL_DECIMAL: char = '.';

/// Knobs for a single parse call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat integers as major units (`100` → `100.00`) instead of minor units.
    pub force_decimals: bool,
}

impl ParseOptions {
    pub fn decimals() -> Self {
        Self {
            force_decimals: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Symbol table
// ─────────────────────────────────────────────────────────────────────────────

/// Symbols the parser recognises, mapped to the currency they stand for.
///
/// Symbols are ambiguous in the wild (`$` is also AUD, CAD, ...). The table
/// picks one currency per symbol; the only other disambiguation the parser
/// does is to prefer the default currency's own symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<(String, CurrencyCode)>,
}

impl SymbolTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The small fixed table used unless configured otherwise.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for (symbol, code) in [
            ("$", b"USD"),
            ("A$", b"AUD"),
            ("CA$", b"CAD"),
            ("C$", b"CAD"),
            ("€", b"EUR"),
            ("£", b"GBP"),
            ("¥", b"JPY"),
            ("₹", b"INR"),
            ("Ƀ", b"XBT"),
        ] {
            table.insert(symbol, CurrencyCode::from_static(code));
        }
        table
    }

    /// Standard table with the configured overrides layered on top.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, DomainError> {
        let mut table = Self::standard();
        for (symbol, code) in &config.symbols {
            table.insert(symbol, CurrencyCode::new(code)?);
        }
        Ok(table)
    }

    /// Maps a symbol to a code, replacing any previous mapping of that symbol.
    /// Empty symbols are ignored.
    pub fn insert(&mut self, symbol: &str, code: CurrencyCode) {
        if symbol.is_empty() {
            return;
        }
        self.entries.retain(|(existing, _)| existing != symbol);
        self.entries.push((symbol.to_string(), code));
        // longest first so `A$` wins over `$`
        self.entries
            .sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    }

    pub fn resolve(&self, symbol: &str) -> Option<CurrencyCode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == symbol)
            .map(|(_, code)| *code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CurrencyCode)> {
        self.entries.iter().map(|(symbol, code)| (symbol.as_str(), *code))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Turns [`MoneyInput`] values into [`Money`] against an injected registry.
#[derive(Debug, Clone)]
pub struct MoneyParser {
    registry: Arc<CurrencyRegistry>,
    symbols: SymbolTable,
}

impl MoneyParser {
    /// Creates a parser using the standard symbol table.
    pub fn new(registry: Arc<CurrencyRegistry>) -> Self {
        Self {
            registry,
            symbols: SymbolTable::standard(),
        }
    }

    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn registry(&self) -> &Arc<CurrencyRegistry> {
        &self.registry
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Parses with integers read as minor units.
    ///
    /// Returns `Ok(None)` for `MoneyInput::Null`.
    pub fn parse(
        &self,
        input: MoneyInput,
        default_currency: &str,
    ) -> Result<Option<Money>, DomainError> {
        self.parse_with(input, default_currency, ParseOptions::default())
    }

    pub fn parse_with(
        &self,
        input: MoneyInput,
        default_currency: &str,
        options: ParseOptions,
    ) -> Result<Option<Money>, DomainError> {
        let money = match input {
            MoneyInput::Null => return Ok(None),
            MoneyInput::Money(money) => money,
            MoneyInput::Other(description) => {
                return Err(DomainError::InvalidInput {
                    target: format!("money amount ({})", description),
                });
            }
            MoneyInput::Integer(amount) => {
                let currency = self.registry.lookup(default_currency)?;
                let amount = if options.force_decimals {
                    amount * scale(currency.exponent())
                } else {
                    amount
                };
                Money::from_minor_units(amount, currency)
            }
            MoneyInput::Float(value) => {
                self.parse_float(value, self.registry.lookup(default_currency)?)?
            }
            MoneyInput::Text(text) => {
                self.parse_text(&text, self.registry.lookup(default_currency)?)?
            }
        };
        Ok(Some(money))
    }

    /// Parses text, the most common entry point for user input.
    pub fn parse_str(&self, text: &str, default_currency: &str) -> Result<Money, DomainError> {
        let currency = self.registry.lookup(default_currency)?;
        self.parse_text(text, currency)
    }

    fn parse_float(&self, value: f64, currency: Arc<Currency>) -> Result<Money, DomainError> {
        // Display prints the shortest digits that round-trip and never uses
        // exponent notation.
        let text = value.to_string();
        if !value.is_finite() {
            return Err(DomainError::parse(text));
        }
        let (negative, body) = split_sign(&text);
        let magnitude = parse_numeral(body, None, CANONICAL_DECIMAL, currency.exponent())
            .ok_or_else(|| DomainError::parse(text.as_str()))?;
        Ok(Money::from_minor_units(
            apply_sign(negative, magnitude),
            currency,
        ))
    }

    fn parse_text(&self, raw: &str, default: Arc<Currency>) -> Result<Money, DomainError> {
        let trimmed = raw.trim();
        let (outer_negative, rest) = split_sign(trimmed);
        let (currency, body, marked) = self.resolve_currency(rest, default)?;
        let (inner_negative, body) = split_sign(body);
        if outer_negative && inner_negative {
            return Err(DomainError::parse(raw));
        }

        let exponent = currency.exponent();
        let styled = (currency.grouping_separator(), currency.decimal_separator());
        let canonical = (CANONICAL_GROUPING, CANONICAL_DECIMAL);

        // Marked text follows the currency's own style; bare numerals use the
        // canonical `,`/`.` pair first unless the currency formats without a
        // symbol, in which case its own output is always bare.
        let attempts = if marked || currency.symbol().is_empty() {
            [styled, canonical]
        } else {
            [canonical, styled]
        };
        let magnitude = attempts
            .iter()
            .find_map(|(grouping, decimal)| parse_numeral(body, Some(*grouping), *decimal, exponent))
            .ok_or_else(|| DomainError::parse(raw))?;

        Ok(Money::from_minor_units(
            apply_sign(outer_negative || inner_negative, magnitude),
            currency,
        ))
    }

    /// Finds the currency marker on `text` and returns the currency, the text
    /// without the marker, and whether a marker was present.
    fn resolve_currency<'t>(
        &self,
        text: &'t str,
        default: Arc<Currency>,
    ) -> Result<(Arc<Currency>, &'t str, bool), DomainError> {
        let mut best: Option<(usize, CurrencyCode, &'t str)> = None;
        let candidates = std::iter::once((default.symbol(), default.code())).chain(self.symbols.iter());
        for (symbol, code) in candidates {
            let Some(body) = strip_affix(text, symbol) else {
                continue;
            };
            let len = symbol.chars().count();
            // strictly longer only, so the default currency wins ties
            if best.as_ref().is_none_or(|(best_len, _, _)| len > *best_len) {
                best = Some((len, code, body));
            }
        }

        if let Some((_, code, body)) = best {
            let currency = if code == default.code() {
                default
            } else {
                self.registry
                    .get(code)
                    .cloned()
                    .ok_or_else(|| DomainError::UnknownCurrency(code.to_string()))?
            };
            return Ok((currency, body, true));
        }

        if let Some((currency, body)) = self.strip_code(text) {
            return Ok((currency, body, true));
        }

        Ok((default, text, false))
    }

    /// Recognises a registered three-letter code as prefix or suffix (`EUR 10`).
    fn strip_code<'t>(&self, text: &'t str) -> Option<(Arc<Currency>, &'t str)> {
        let bytes = text.as_bytes();
        if bytes.len() <= 3 {
            return None;
        }
        let lookup = |candidate: &str| {
            CurrencyCode::new(candidate)
                .ok()
                .and_then(|code| self.registry.get(code).cloned())
        };
        if bytes[..3].iter().all(u8::is_ascii_alphabetic) && !bytes[3].is_ascii_alphabetic() {
            if let Some(currency) = lookup(&text[..3]) {
                return Some((currency, text[3..].trim_start()));
            }
        }
        let split = bytes.len() - 3;
        if bytes[split..].iter().all(u8::is_ascii_alphabetic) && !bytes[split - 1].is_ascii_alphabetic()
        {
            if let Some(currency) = lookup(&text[split..]) {
                return Some((currency, text[..split].trim_end()));
            }
        }
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Numeral helpers
// ─────────────────────────────────────────────────────────────────────────────

fn scale(exponent: u32) -> BigInt {
    num_traits::pow(BigInt::from(10), exponent as usize)
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest.trim_start())
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest.trim_start())
    } else {
        (false, text)
    }
}

fn apply_sign(negative: bool, magnitude: BigInt) -> BigInt {
    if negative { -magnitude } else { magnitude }
}

fn strip_affix<'t>(text: &'t str, symbol: &str) -> Option<&'t str> {
    if symbol.is_empty() {
        return None;
    }
    if let Some(rest) = text.strip_prefix(symbol) {
        return Some(rest.trim_start());
    }
    text.strip_suffix(symbol).map(str::trim_end)
}

/// Parses an unsigned numeral into minor units.
///
/// Grouping separators must delimit groups of exactly three digits after a
/// leading group of one to three. Fractional digits beyond `exponent` are
/// rounded half-up.
fn parse_numeral(
    body: &str,
    grouping: Option<char>,
    decimal: char,
    exponent: u32,
) -> Option<BigInt> {
    let (integer, fraction) = match body.split_once(decimal) {
        Some((integer, fraction)) => (integer, fraction),
        None => (body, ""),
    };
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let integer_digits = match grouping {
        Some(separator) if integer.contains(separator) => {
            let groups: Vec<&str> = integer.split(separator).collect();
            let well_formed = groups.iter().enumerate().all(|(i, group)| {
                let digits = group.bytes().all(|b| b.is_ascii_digit());
                let width = if i == 0 {
                    (1..=3).contains(&group.len())
                } else {
                    group.len() == 3
                };
                digits && width
            });
            if !well_formed {
                return None;
            }
            groups.concat()
        }
        _ => {
            if !integer.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            integer.to_string()
        }
    };
    if integer_digits.is_empty() && fraction.is_empty() {
        return None;
    }

    let exponent = exponent as usize;
    let (kept, dropped) = fraction.split_at(fraction.len().min(exponent));

    let mut digits = integer_digits;
    digits.push_str(kept);
    digits.extend(std::iter::repeat_n('0', exponent - kept.len()));
    if digits.is_empty() {
        digits.push('0');
    }

    let mut value = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    if dropped.bytes().next().is_some_and(|b| b >= b'5') {
        value += BigInt::one();
    }
    Some(value)
}
