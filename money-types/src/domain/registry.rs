//! Currency registry.
//!
//! The registry is an explicit value: build it once from configuration, wrap it
//! in an `Arc` and hand it to whatever needs to resolve codes. There are no
//! built-in entries; a code that was never registered is an error everywhere.

use num_bigint::BigInt;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::currency::{Currency, CurrencyCode};
use crate::domain::money::Money;
use crate::dto::RegistryConfig;
use crate::error::DomainError;

/// Table of registered currencies keyed by code.
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    currencies: BTreeMap<CurrencyCode, Arc<Currency>>,
}

impl CurrencyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a configuration table.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, DomainError> {
        let mut registry = Self::new();
        for (code, entry) in &config.currencies {
            let code = CurrencyCode::new(code)?;
            let currency = Currency::with_separators(
                code,
                entry.exponent,
                entry.symbol.clone(),
                entry.grouping_separator.unwrap_or(','),
                entry.decimal_separator.unwrap_or('.'),
            )?;
            registry.insert(currency);
        }
        Ok(registry)
    }

    /// Registers a currency with the default separators.
    ///
    /// Re-registering a code replaces the previous entry.
    pub fn register(
        &mut self,
        code: &str,
        exponent: u32,
        symbol: &str,
    ) -> Result<Arc<Currency>, DomainError> {
        let currency = Currency::new(CurrencyCode::new(code)?, exponent, symbol)?;
        Ok(self.insert(currency))
    }

    /// Inserts a fully specified currency, replacing any entry with the same code.
    pub fn insert(&mut self, currency: Currency) -> Arc<Currency> {
        let currency = Arc::new(currency);
        self.currencies.insert(currency.code(), Arc::clone(&currency));
        currency
    }

    /// Resolves a code to its registered currency.
    pub fn lookup(&self, code: &str) -> Result<Arc<Currency>, DomainError> {
        let parsed =
            CurrencyCode::new(code).map_err(|_| DomainError::UnknownCurrency(code.to_string()))?;
        self.get(parsed)
            .cloned()
            .ok_or_else(|| DomainError::UnknownCurrency(parsed.to_string()))
    }

    /// Returns the entry for an already parsed code.
    pub fn get(&self, code: CurrencyCode) -> Option<&Arc<Currency>> {
        self.currencies.get(&code)
    }

    /// Whether `code` has been registered.
    pub fn contains(&self, code: CurrencyCode) -> bool {
        self.currencies.contains_key(&code)
    }

    /// Creates money from minor units in a registered currency.
    pub fn money(&self, minor_units: impl Into<BigInt>, code: &str) -> Result<Money, DomainError> {
        Ok(Money::from_minor_units(minor_units, self.lookup(code)?))
    }

    /// Iterates the registered currencies in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Currency>> {
        self.currencies.values()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}
