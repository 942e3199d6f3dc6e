//! Record store port trait.
//!
//! Stores persist raw column scalars only; turning them into money values is
//! the cast adapter's job. Adapters (SQLite, in-memory) implement this trait.

use crate::domain::{Attributes, ModelSchema, RecordId};
use crate::error::RepoError;

/// Persistence port for cast models.
///
/// Every record has an integer `id` assigned by the store on insert,
/// starting at 1 per table.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Makes the store ready to hold records of this schema.
    async fn prepare(&self, schema: &ModelSchema) -> Result<(), RepoError>;

    /// Inserts a record and returns its new id.
    ///
    /// Columns missing from `attributes` are stored as null.
    async fn insert(&self, schema: &ModelSchema, attributes: &Attributes)
    -> Result<RecordId, RepoError>;

    /// Overwrites the given columns of an existing record.
    ///
    /// Fails with `RepoError::NotFound` if no record has this id.
    async fn update(
        &self,
        schema: &ModelSchema,
        id: RecordId,
        attributes: &Attributes,
    ) -> Result<(), RepoError>;

    /// Loads the columns of a record.
    async fn find(&self, schema: &ModelSchema, id: RecordId)
    -> Result<Option<Attributes>, RepoError>;
}
