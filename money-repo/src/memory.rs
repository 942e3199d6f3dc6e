//! In-memory record store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;

use money_types::{Attributes, ModelSchema, RecordId, RecordStore, RepoError, StoredValue};

use crate::ident::{check_attributes, check_schema};

#[derive(Debug, Default)]
struct Table {
    last_id: RecordId,
    rows: BTreeMap<RecordId, Attributes>,
}

/// Record store keeping every table in a `DashMap`.
///
/// Ids are per-table sequences starting at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: DashMap<String, Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a table, 0 when it was never prepared.
    pub fn count(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, |t| t.rows.len())
    }
}

fn not_prepared(schema: &ModelSchema) -> RepoError {
    RepoError::Database(format!("no such table: {}", schema.table()))
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn prepare(&self, schema: &ModelSchema) -> Result<(), RepoError> {
        check_schema(schema)?;
        self.tables.entry(schema.table().to_string()).or_default();
        tracing::debug!(table = schema.table(), "memory table ready");
        Ok(())
    }

    async fn insert(
        &self,
        schema: &ModelSchema,
        attributes: &Attributes,
    ) -> Result<RecordId, RepoError> {
        check_attributes(schema, attributes)?;
        let mut table = self
            .tables
            .get_mut(schema.table())
            .ok_or_else(|| not_prepared(schema))?;

        let row = schema
            .columns()
            .iter()
            .map(|column| {
                let value = attributes.get(column).cloned().unwrap_or(StoredValue::Null);
                (column.clone(), value)
            })
            .collect();

        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, row);
        Ok(id)
    }

    async fn update(
        &self,
        schema: &ModelSchema,
        id: RecordId,
        attributes: &Attributes,
    ) -> Result<(), RepoError> {
        check_attributes(schema, attributes)?;
        let mut table = self
            .tables
            .get_mut(schema.table())
            .ok_or_else(|| not_prepared(schema))?;
        let row = table.rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        row.extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    async fn find(
        &self,
        schema: &ModelSchema,
        id: RecordId,
    ) -> Result<Option<Attributes>, RepoError> {
        let table = self
            .tables
            .get(schema.table())
            .ok_or_else(|| not_prepared(schema))?;
        Ok(table.rows.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn schema() -> ModelSchema {
        ModelSchema::new("Item", "items").column("name").column("price")
    }

    #[tokio::test]
    async fn test_ids_start_at_one_per_table() {
        let store = MemoryStore::new();
        let items = schema();
        let others = ModelSchema::new("Other", "others").column("name");
        store.prepare(&items).await.unwrap();
        store.prepare(&others).await.unwrap();

        assert_eq!(store.insert(&items, &Attributes::new()).await.unwrap(), 1);
        assert_eq!(store.insert(&items, &Attributes::new()).await.unwrap(), 2);
        assert_eq!(store.insert(&others, &Attributes::new()).await.unwrap(), 1);
        assert_eq!(store.count("items"), 2);
    }

    #[tokio::test]
    async fn test_insert_fills_missing_columns_with_null() {
        let store = MemoryStore::new();
        let items = schema();
        store.prepare(&items).await.unwrap();

        let attributes = Attributes::from([("name".to_string(), StoredValue::from("pen"))]);
        let id = store.insert(&items, &attributes).await.unwrap();

        let row = store.find(&items, id).await.unwrap().unwrap();
        assert_eq!(row["name"], StoredValue::from("pen"));
        assert_eq!(row["price"], StoredValue::Null);
    }

    #[tokio::test]
    async fn test_update_and_missing_record() {
        let store = MemoryStore::new();
        let items = schema();
        store.prepare(&items).await.unwrap();
        let id = store.insert(&items, &Attributes::new()).await.unwrap();

        let price = Attributes::from([("price".to_string(), StoredValue::Integer(250))]);
        store.update(&items, id, &price).await.unwrap();
        let row = store.find(&items, id).await.unwrap().unwrap();
        assert_eq!(row["price"], StoredValue::Integer(250));

        assert!(matches!(
            store.update(&items, 99, &price).await,
            Err(RepoError::NotFound)
        ));
        assert_eq!(store.find(&items, 99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unprepared_table() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.insert(&schema(), &Attributes::new()).await,
            Err(RepoError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let store = Arc::new(MemoryStore::new());
        let items = Arc::new(schema());
        store.prepare(&items).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let items = Arc::clone(&items);
                tokio::spawn(async move { store.insert(&items, &Attributes::new()).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }
}
