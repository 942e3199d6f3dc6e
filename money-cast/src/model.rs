//! A record of a cast model: plain column values plus parsed money fields.

use std::collections::BTreeMap;
use std::sync::Arc;

use money_types::{Attributes, CastError, ModelSchema, Money, RecordId, StoredValue};

static NULL: StoredValue = StoredValue::Null;

/// One record of a [`ModelSchema`].
///
/// Money fields hold parsed values; they only turn back into column scalars
/// when the record is dehydrated for saving.
#[derive(Debug, Clone)]
pub struct Model {
    schema: Arc<ModelSchema>,
    id: Option<RecordId>,
    attributes: Attributes,
    money: BTreeMap<String, Option<Money>>,
}

impl Model {
    /// Creates an unsaved record with every column null.
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        let money = schema
            .casts()
            .map(|(field, _)| (field.to_string(), None))
            .collect();
        Self {
            schema,
            id: None,
            attributes: Attributes::new(),
            money,
        }
    }

    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    /// Store-assigned id, `None` until the first save.
    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the money value of a cast field.
    pub fn money(&self, field: &str) -> Result<Option<&Money>, CastError> {
        match self.money.get(field) {
            Some(value) => Ok(value.as_ref()),
            None if self.schema.has_column(field) => Err(CastError::NotMoney(field.to_string())),
            None => Err(CastError::UnknownAttribute(field.to_string())),
        }
    }

    /// Returns the value of a plain column (null when never set).
    pub fn attribute(&self, column: &str) -> Result<&StoredValue, CastError> {
        self.check_plain(column)?;
        Ok(self.attributes.get(column).unwrap_or(&NULL))
    }

    /// Sets a plain column.
    pub fn set_attribute(
        &mut self,
        column: &str,
        value: impl Into<StoredValue>,
    ) -> Result<(), CastError> {
        self.check_plain(column)?;
        self.attributes.insert(column.to_string(), value.into());
        Ok(())
    }

    /// Plain column values.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn put_money(&mut self, field: &str, value: Option<Money>) {
        self.money.insert(field.to_string(), value);
    }

    pub(crate) fn put_attribute(&mut self, column: &str, value: StoredValue) {
        self.attributes.insert(column.to_string(), value);
    }

    pub(crate) fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn check_plain(&self, column: &str) -> Result<(), CastError> {
        if self.schema.binding(column).is_some() {
            return Err(CastError::MoneyAttribute(column.to_string()));
        }
        if !self.schema.has_column(column) {
            return Err(CastError::UnknownAttribute(column.to_string()));
        }
        Ok(())
    }
}
