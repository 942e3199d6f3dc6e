//! # Money Types
//!
//! Exact money values and the pure functions around them.
//! This crate has ZERO external IO dependencies - only data structures,
//! parsing and formatting rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the workspace:
//! - `domain/` - Currency registry, exact amounts, parser, formatter, cast declarations
//! - `ports/` - Trait definitions that storage adapters must implement
//! - `dto/` - Inputs and configuration crossing the crate boundary
//! - `error/` - Domain, repository and cast error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Attributes, CastBinding, Currency, CurrencyCode, CurrencyRegistry, CurrencySource,
    ModelSchema, Money, MoneyParser, ParseOptions, RecordId, StorageForm, StoredValue,
    SymbolTable, format_decimal, format_money,
};
pub use dto::*;
pub use error::{CastError, DomainError, RepoError};
pub use num_bigint::BigInt;
pub use ports::RecordStore;
