//! Configuration loading from environment.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use money_types::{CurrencyCode, CurrencyRegistry, MoneyParser, RegistryConfig, SymbolTable};

/// Currency table shipped with the binary.
const BUNDLED: &str = include_str!("../currencies.json");

#[derive(Debug, Deserialize)]
struct ConfigFile {
    default_currency: Option<String>,
    #[serde(flatten)]
    registry: RegistryConfig,
}

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub default_currency: String,
    pub registry: RegistryConfig,
}

/// The process-wide parser and the currency used when input names none.
pub struct Currencies {
    pub parser: MoneyParser,
    pub default_currency: CurrencyCode,
}

impl Currencies {
    /// Symbols whose currency is missing from the registry. Parsing text with
    /// one of them fails with `UnknownCurrency`.
    pub fn unregistered_symbols(&self) -> Vec<(String, CurrencyCode)> {
        let registry = self.parser.registry();
        self.parser
            .symbols()
            .iter()
            .filter(|(_, code)| !registry.contains(*code))
            .map(|(symbol, code)| (symbol.to_string(), code))
            .collect()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `MONEY_CONFIG` points at a JSON currency table (the bundled one is used
    /// otherwise), `MONEY_DEFAULT_CURRENCY` overrides its default currency.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = match env::var("MONEY_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading currency config {path}"))?;
                Self::from_json(&text).with_context(|| format!("parsing currency config {path}"))?
            }
            Err(_) => Self::from_json(BUNDLED)?,
        };

        if let Ok(code) = env::var("MONEY_DEFAULT_CURRENCY") {
            config.default_currency = code;
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = serde_json::from_str(text)?;
        Ok(Self {
            default_currency: file.default_currency.unwrap_or_else(|| "USD".to_string()),
            registry: file.registry,
        })
    }

    /// Builds the registry and parser. The default currency must be registered.
    pub fn build(&self) -> anyhow::Result<Currencies> {
        let registry = Arc::new(CurrencyRegistry::from_config(&self.registry)?);
        let default_currency = registry
            .lookup(&self.default_currency)
            .context("default currency is not configured")?
            .code();
        let symbols = SymbolTable::from_config(&self.registry)?;
        let parser = MoneyParser::new(registry).with_symbols(symbols);
        Ok(Currencies {
            parser,
            default_currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config() {
        let config = Config::from_json(BUNDLED).unwrap();
        assert_eq!(config.default_currency, "USD");

        let currencies = config.build().unwrap();
        let registry = currencies.parser.registry();
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.lookup("JPY").unwrap().exponent(), 0);
        assert_eq!(registry.lookup("XBT").unwrap().exponent(), 8);
        assert_eq!(currencies.default_currency.as_str(), "USD");
        assert!(currencies.unregistered_symbols().is_empty());
    }

    #[test]
    fn test_bundled_symbol_override() {
        let currencies = Config::from_json(BUNDLED).unwrap().build().unwrap();
        let money = currencies.parser.parse_str("R$1.234,50", "USD").unwrap();
        assert_eq!(money.currency_code().as_str(), "BRL");
        assert_eq!(money.format(), "R$1.234,50");
    }

    #[test]
    fn test_unregistered_symbols() {
        let config = Config::from_json(
            r#"{ "currencies": { "USD": { "exponent": 2, "symbol": "$" },
                                 "EUR": { "exponent": 2, "symbol": "€" } },
                 "symbols": { "kr": "SEK" } }"#,
        )
        .unwrap();
        let missing: Vec<String> = config
            .build()
            .unwrap()
            .unregistered_symbols()
            .into_iter()
            .map(|(_, code)| code.to_string())
            .collect();
        assert!(missing.contains(&"SEK".to_string()));
        assert!(missing.contains(&"JPY".to_string()));
        assert!(!missing.contains(&"USD".to_string()));
        assert!(!missing.contains(&"EUR".to_string()));
    }

    #[test]
    fn test_default_currency_falls_back_to_usd() {
        let config = Config::from_json(
            r#"{ "currencies": { "USD": { "exponent": 2, "symbol": "$" } } }"#,
        )
        .unwrap();
        assert_eq!(config.default_currency, "USD");
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_unregistered_default_currency() {
        let config = Config::from_json(
            r#"{ "default_currency": "EUR",
                 "currencies": { "USD": { "exponent": 2, "symbol": "$" } } }"#,
        )
        .unwrap();
        let err = config.build().err().unwrap();
        assert_eq!(err.to_string(), "default currency is not configured");
    }

    #[test]
    fn test_invalid_currency_definition() {
        let config = Config::from_json(
            r#"{ "currencies": { "USD": { "exponent": 2, "symbol": "$",
                 "grouping_separator": ".", "decimal_separator": "." } } }"#,
        )
        .unwrap();
        assert!(config.build().is_err());
    }
}
