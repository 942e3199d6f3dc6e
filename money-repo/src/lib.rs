//! # Money Repository
//!
//! Concrete record stores (adapters) for money cast models.
//! This crate provides storage adapters that implement the `RecordStore` port.

use async_trait::async_trait;
use money_types::{Attributes, ModelSchema, RecordId, RecordStore, RepoError};

mod ident;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// URL selecting the in-memory store.
pub const MEMORY_URL: &str = "memory://";

/// Unified store wrapper over the available adapters.
pub enum Store {
    Memory(MemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteStore),
}

/// Build a store from a database URL.
///
/// `memory://` selects the in-memory store, anything else is handed to SQLite.
///
/// # Examples
///
/// ```ignore
/// let store = build_store("sqlite://money.db?mode=rwc").await?;
/// let store = build_store("sqlite::memory:").await?;
/// let store = build_store(MEMORY_URL).await?;
/// ```
pub async fn build_store(database_url: &str) -> anyhow::Result<Store> {
    Store::new(database_url).await
}

impl Store {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        if database_url == MEMORY_URL {
            return Ok(Store::Memory(MemoryStore::new()));
        }
        Self::connect(database_url).await
    }

    #[cfg(feature = "sqlite")]
    async fn connect(database_url: &str) -> anyhow::Result<Self> {
        Ok(Store::Sqlite(SqliteStore::new(database_url).await?))
    }

    #[cfg(not(feature = "sqlite"))]
    async fn connect(database_url: &str) -> anyhow::Result<Self> {
        anyhow::bail!("no store adapter for {database_url}; enable the `sqlite` feature")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement RecordStore for Store (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RecordStore for Store {
    async fn prepare(&self, schema: &ModelSchema) -> Result<(), RepoError> {
        match self {
            Store::Memory(store) => store.prepare(schema).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(store) => store.prepare(schema).await,
        }
    }

    async fn insert(
        &self,
        schema: &ModelSchema,
        attributes: &Attributes,
    ) -> Result<RecordId, RepoError> {
        match self {
            Store::Memory(store) => store.insert(schema, attributes).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(store) => store.insert(schema, attributes).await,
        }
    }

    async fn update(
        &self,
        schema: &ModelSchema,
        id: RecordId,
        attributes: &Attributes,
    ) -> Result<(), RepoError> {
        match self {
            Store::Memory(store) => store.update(schema, id, attributes).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(store) => store.update(schema, id, attributes).await,
        }
    }

    async fn find(
        &self,
        schema: &ModelSchema,
        id: RecordId,
    ) -> Result<Option<Attributes>, RepoError> {
        match self {
            Store::Memory(store) => store.find(schema, id).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(store) => store.find(schema, id).await,
        }
    }
}
