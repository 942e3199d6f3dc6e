//! Declarations binding stored columns to money values.
//!
//! How a money field is persisted is a static, per-field choice made when the
//! schema is declared. Nothing here inspects stored values to guess it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::currency::CurrencyCode;

/// Primary key of a stored record.
pub type RecordId = i64;

/// Column values of one record, keyed by column name.
pub type Attributes = BTreeMap<String, StoredValue>;

/// A scalar as held by a record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl StoredValue {
    pub fn is_null(&self) -> bool {
        matches!(self, StoredValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Null => f.write_str("NULL"),
            StoredValue::Integer(value) => write!(f, "{}", value),
            StoredValue::Real(value) => write!(f, "{}", value),
            StoredValue::Text(value) => write!(f, "'{}'", value),
        }
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Integer(value)
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Real(value)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}

impl<T: Into<StoredValue>> From<Option<T>> for StoredValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StoredValue::Null, Into::into)
    }
}

/// Persisted representation of a money field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageForm {
    /// Display string with symbol and grouping, e.g. `$1,234.56`.
    Formatted,
    /// Plain decimal in major units, e.g. `1234.56`.
    Decimal,
    /// Integer count of minor units, e.g. `123456`.
    MinorUnits,
}

impl StorageForm {
    /// Whether bare integers assigned to this field are major units.
    pub fn forces_decimals(self) -> bool {
        !matches!(self, StorageForm::MinorUnits)
    }
}

/// Where a money field gets its currency from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencySource {
    /// The application's default currency.
    Default,
    /// Always this currency.
    Fixed(CurrencyCode),
    /// A sibling text column on the same record holding the code.
    Column(String),
}

/// Static cast declaration for one money column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastBinding {
    pub form: StorageForm,
    pub currency: CurrencySource,
}

impl CastBinding {
    pub fn new(form: StorageForm) -> Self {
        Self {
            form,
            currency: CurrencySource::Default,
        }
    }

    pub fn formatted() -> Self {
        Self::new(StorageForm::Formatted)
    }

    pub fn decimal() -> Self {
        Self::new(StorageForm::Decimal)
    }

    pub fn minor_units() -> Self {
        Self::new(StorageForm::MinorUnits)
    }

    pub fn with_currency(mut self, code: CurrencyCode) -> Self {
        self.currency = CurrencySource::Fixed(code);
        self
    }

    pub fn with_currency_column(mut self, column: impl Into<String>) -> Self {
        self.currency = CurrencySource::Column(column.into());
        self
    }

    /// The sibling currency column, if any.
    pub fn currency_column(&self) -> Option<&str> {
        match &self.currency {
            CurrencySource::Column(column) => Some(column),
            _ => None,
        }
    }
}

/// Shape of a model: its table, plain columns and money casts.
///
/// Every record also has an integer `id` primary key, which is not listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    name: String,
    table: String,
    columns: Vec<String>,
    casts: BTreeMap<String, CastBinding>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
            casts: BTreeMap::new(),
        }
    }

    /// Adds a plain column.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
        self
    }

    /// Adds a money column; a sibling currency column is added as plain column.
    pub fn cast(mut self, column: impl Into<String>, binding: CastBinding) -> Self {
        let column = column.into();
        if let Some(sibling) = binding.currency_column() {
            let sibling = sibling.to_string();
            self = self.column(sibling);
        }
        self = self.column(column.clone());
        self.casts.insert(column, binding);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// All columns in declaration order, cast columns included.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn binding(&self, column: &str) -> Option<&CastBinding> {
        self.casts.get(column)
    }

    pub fn casts(&self) -> impl Iterator<Item = (&str, &CastBinding)> {
        self.casts.iter().map(|(column, binding)| (column.as_str(), binding))
    }

    /// How errors refer to a field of this model, e.g. `User::$money`.
    pub fn field_label(&self, field: &str) -> String {
        format!("{}::${}", self.name, field)
    }
}
