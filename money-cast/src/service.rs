//! Cast Application Service
//!
//! Loads and saves cast models through the record store port.
//! Contains NO storage logic - only the read and write sides of the cast.

use std::sync::Arc;

use money_types::{CastError, ModelSchema, RecordId, RecordStore};

use crate::caster::MoneyCaster;
use crate::model::Model;

/// Application service for cast models.
///
/// Generic over `R: RecordStore` - the adapter is injected at compile time.
pub struct CastService<R: RecordStore> {
    store: R,
    caster: MoneyCaster,
}

impl<R: RecordStore> CastService<R> {
    pub fn new(store: R, caster: MoneyCaster) -> Self {
        Self { store, caster }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn caster(&self) -> &MoneyCaster {
        &self.caster
    }

    /// Creates an unsaved record of the given schema.
    pub fn make(&self, schema: &Arc<ModelSchema>) -> Model {
        Model::new(Arc::clone(schema))
    }

    /// Readies the store for a schema (creates its table if needed).
    pub async fn prepare(&self, schema: &ModelSchema) -> Result<(), CastError> {
        self.store.prepare(schema).await?;
        tracing::debug!(model = schema.name(), table = schema.table(), "schema prepared");
        Ok(())
    }

    /// Loads a record and parses every money field.
    pub async fn find(&self, schema: &Arc<ModelSchema>, id: RecordId) -> Result<Model, CastError> {
        let attributes = self
            .store
            .find(schema, id)
            .await?
            .ok_or_else(|| CastError::NotFound {
                model: schema.name().to_string(),
                id,
            })?;

        let model = self.caster.hydrate(Arc::clone(schema), id, attributes)?;
        tracing::debug!(model = schema.name(), id, "record loaded");
        Ok(model)
    }

    /// Writes a record, inserting it on first save. Returns its id.
    pub async fn save(&self, model: &mut Model) -> Result<RecordId, CastError> {
        let attributes = self.caster.dehydrate(model);
        let schema = Arc::clone(model.schema());

        let id = match model.id() {
            Some(id) => {
                self.store.update(&schema, id, &attributes).await?;
                id
            }
            None => {
                let id = self.store.insert(&schema, &attributes).await?;
                model.set_id(id);
                id
            }
        };

        // Mirror the written currency columns on the in-memory record.
        for column in schema.casts().filter_map(|(_, binding)| binding.currency_column()) {
            if let Some(value) = attributes.get(column) {
                model.put_attribute(column, value.clone());
            }
        }

        tracing::debug!(model = schema.name(), id, "record saved");
        Ok(id)
    }
}
