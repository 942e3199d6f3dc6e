//! Domain models for exact money handling.

pub mod cast;
pub mod currency;
pub mod format;
pub mod money;
pub mod parser;
pub mod registry;

pub use cast::{Attributes, CastBinding, CurrencySource, ModelSchema, RecordId, StorageForm, StoredValue};
pub use currency::{Currency, CurrencyCode};
pub use format::{format_decimal, format_money};
pub use money::Money;
pub use parser::{MoneyParser, ParseOptions, SymbolTable};
pub use registry::CurrencyRegistry;
