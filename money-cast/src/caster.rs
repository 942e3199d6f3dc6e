//! The cast adapter.
//!
//! Reads parse stored scalars through the money parser, assignments parse
//! caller input, writes format money into each field's declared storage form.
//! This is the only place the parser and formatter meet the storage boundary.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::sync::Arc;

use money_types::{
    Attributes, CastBinding, CastError, CurrencyCode, CurrencySource, DomainError, ModelSchema,
    Money, MoneyInput, MoneyParser, ParseOptions, RecordId, StorageForm, StoredValue,
};

use crate::model::Model;

/// Maps money fields of a [`Model`] to and from stored scalars.
#[derive(Debug, Clone)]
pub struct MoneyCaster {
    parser: MoneyParser,
    default_currency: CurrencyCode,
}

impl MoneyCaster {
    /// Creates a caster. The default currency must be registered.
    pub fn new(parser: MoneyParser, default_currency: &str) -> Result<Self, DomainError> {
        let default_currency = parser.registry().lookup(default_currency)?.code();
        Ok(Self {
            parser,
            default_currency,
        })
    }

    pub fn parser(&self) -> &MoneyParser {
        &self.parser
    }

    pub fn default_currency(&self) -> CurrencyCode {
        self.default_currency
    }

    /// Assigns a value to a money field.
    ///
    /// A field whose currency comes from a sibling column adopts the parsed
    /// currency and rewrites that column. Fields with a default or fixed
    /// currency reject values in any other currency.
    pub fn set(
        &self,
        model: &mut Model,
        field: &str,
        input: impl Into<MoneyInput>,
    ) -> Result<(), CastError> {
        let schema = Arc::clone(model.schema());
        let binding = binding_for(&schema, field)?;
        let sibling = binding
            .currency_column()
            .and_then(|column| model.attributes().get(column));
        let currency = self.currency_for(binding, sibling)?;

        let options = ParseOptions {
            force_decimals: binding.form.forces_decimals(),
        };
        let money = self
            .parser
            .parse_with(input.into(), currency.as_str(), options)
            .map_err(|err| match err {
                DomainError::InvalidInput { .. } => DomainError::InvalidInput {
                    target: schema.field_label(field),
                },
                other => other,
            })?;

        if let Some(money) = &money {
            match &binding.currency {
                CurrencySource::Column(column) => {
                    if money.currency_code() != currency {
                        tracing::trace!(
                            field,
                            from = %currency,
                            to = %money.currency_code(),
                            "currency column follows assigned money"
                        );
                    }
                    model.put_attribute(column, StoredValue::Text(money.currency_code().to_string()));
                }
                CurrencySource::Default | CurrencySource::Fixed(_) => {
                    if money.currency_code() != currency {
                        return Err(DomainError::CurrencyMismatch {
                            expected: currency,
                            got: money.currency_code(),
                        }
                        .into());
                    }
                }
            }
        }

        model.put_money(field, money);
        Ok(())
    }

    /// Fills several fields at once, like a constructor taking attributes.
    ///
    /// Plain columns are written first so money fields see their sibling
    /// currency columns regardless of argument order. The model is left
    /// untouched if any value is rejected.
    pub fn fill<'a>(
        &self,
        model: &mut Model,
        attributes: impl IntoIterator<Item = (&'a str, MoneyInput)>,
    ) -> Result<(), CastError> {
        let mut staged = model.clone();
        let mut money_fields = Vec::new();
        for (column, input) in attributes {
            if staged.schema().binding(column).is_some() {
                money_fields.push((column, input));
            } else {
                let label = staged.schema().field_label(column);
                staged.set_attribute(column, plain_value(input, label)?)?;
            }
        }
        for (field, input) in money_fields {
            self.set(&mut staged, field, input)?;
        }
        *model = staged;
        Ok(())
    }

    /// Builds a model from stored column values.
    pub fn hydrate(
        &self,
        schema: Arc<ModelSchema>,
        id: RecordId,
        mut attributes: Attributes,
    ) -> Result<Model, CastError> {
        let mut model = Model::new(Arc::clone(&schema));
        model.set_id(id);

        for column in schema.columns() {
            if schema.binding(column).is_none() {
                let value = attributes.remove(column).unwrap_or(StoredValue::Null);
                model.put_attribute(column, value);
            }
        }

        for (field, binding) in schema.casts() {
            let raw = attributes.remove(field).unwrap_or(StoredValue::Null);
            let sibling = binding
                .currency_column()
                .and_then(|column| model.attributes().get(column));
            let currency = self.currency_for(binding, sibling)?;
            let options = ParseOptions {
                force_decimals: binding.form.forces_decimals(),
            };
            let money = self
                .parser
                .parse_with(stored_input(binding.form, raw), currency.as_str(), options)?;
            model.put_money(field, money);
        }

        Ok(model)
    }

    /// Turns a model back into stored column values.
    pub fn dehydrate(&self, model: &Model) -> Attributes {
        let mut attributes = model.attributes().clone();
        for (field, binding) in model.schema().casts() {
            let money = model.money(field).ok().flatten();
            attributes.insert(field.to_string(), stored_value(binding.form, money));
            if let (Some(column), Some(money)) = (binding.currency_column(), money) {
                attributes.insert(
                    column.to_string(),
                    StoredValue::Text(money.currency_code().to_string()),
                );
            }
        }
        attributes
    }

    fn currency_for(
        &self,
        binding: &CastBinding,
        sibling: Option<&StoredValue>,
    ) -> Result<CurrencyCode, DomainError> {
        match &binding.currency {
            CurrencySource::Default => Ok(self.default_currency),
            CurrencySource::Fixed(code) => Ok(*code),
            // blank text reads like null
            CurrencySource::Column(_) => match sibling
                .and_then(StoredValue::as_text)
                .filter(|code| !code.trim().is_empty())
            {
                Some(code) => CurrencyCode::new(code)
                    .map_err(|_| DomainError::UnknownCurrency(code.to_string())),
                None => Ok(self.default_currency),
            },
        }
    }
}

fn binding_for<'s>(schema: &'s ModelSchema, field: &str) -> Result<&'s CastBinding, CastError> {
    schema.binding(field).ok_or_else(|| {
        if schema.has_column(field) {
            CastError::NotMoney(field.to_string())
        } else {
            CastError::UnknownAttribute(field.to_string())
        }
    })
}

/// Reads a stored scalar as parser input. Minor-unit columns may hold
/// integers too large for i64 as digit text.
fn stored_input(form: StorageForm, raw: StoredValue) -> MoneyInput {
    match raw {
        StoredValue::Null => MoneyInput::Null,
        StoredValue::Integer(value) => MoneyInput::from(value),
        StoredValue::Real(value) => MoneyInput::Float(value),
        StoredValue::Text(text) => match form {
            StorageForm::MinorUnits => match text.trim().parse::<BigInt>() {
                Ok(amount) => MoneyInput::Integer(amount),
                Err(_) => MoneyInput::Text(text),
            },
            StorageForm::Formatted | StorageForm::Decimal => MoneyInput::Text(text),
        },
    }
}

fn stored_value(form: StorageForm, money: Option<&Money>) -> StoredValue {
    let Some(money) = money else {
        return StoredValue::Null;
    };
    match form {
        StorageForm::Formatted => StoredValue::Text(money.format()),
        StorageForm::Decimal => StoredValue::Text(money.to_decimal_string()),
        StorageForm::MinorUnits => match money.amount().to_i64() {
            Some(amount) => StoredValue::Integer(amount),
            None => StoredValue::Text(money.amount().to_string()),
        },
    }
}

fn plain_value(input: MoneyInput, label: String) -> Result<StoredValue, DomainError> {
    match input {
        MoneyInput::Null => Ok(StoredValue::Null),
        MoneyInput::Integer(value) => Ok(match value.to_i64() {
            Some(value) => StoredValue::Integer(value),
            None => StoredValue::Text(value.to_string()),
        }),
        MoneyInput::Float(value) => Ok(StoredValue::Real(value)),
        MoneyInput::Text(text) => Ok(StoredValue::Text(text)),
        MoneyInput::Money(_) | MoneyInput::Other(_) => {
            Err(DomainError::InvalidInput { target: label })
        }
    }
}
