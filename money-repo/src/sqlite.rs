//! SQLite record store adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow, SqliteValueRef,
};
use sqlx::{Row, Sqlite, SqlitePool, TypeInfo, ValueRef};
use std::str::FromStr;

use money_types::{Attributes, ModelSchema, RecordId, RecordStore, RepoError, StoredValue};

use crate::ident::{check_attributes, check_schema, quoted};

type Query<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Store
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite record store.
///
/// Tables get untyped columns, so every value keeps the storage class it was
/// written with (integer, real, text or null).
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to a database, creating the file if needed.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            // every connection would otherwise see its own empty database
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        tracing::debug!(database_url, "sqlite store connected");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn existing_columns(&self, table: &str) -> Result<Vec<String>, RepoError> {
        let rows = sqlx::query("SELECT name FROM pragma_table_info(?)")
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        rows.iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<Result<_, _>>()
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RecordStore for SqliteStore {
    async fn prepare(&self, schema: &ModelSchema) -> Result<(), RepoError> {
        check_schema(schema)?;
        let table = quoted(schema.table())?;

        let mut ddl = format!("CREATE TABLE IF NOT EXISTS {table} (id INTEGER PRIMARY KEY AUTOINCREMENT");
        for column in schema.columns() {
            ddl.push_str(", ");
            ddl.push_str(&quoted(column)?);
        }
        ddl.push(')');

        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        // Tables created by an older schema only gain the new columns.
        let existing = self.existing_columns(schema.table()).await?;
        for column in schema.columns() {
            if !existing.iter().any(|c| c == column) {
                let alter = format!("ALTER TABLE {table} ADD COLUMN {}", quoted(column)?);
                sqlx::query(&alter)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| RepoError::Database(e.to_string()))?;
                tracing::debug!(table = schema.table(), column, "column added");
            }
        }

        tracing::debug!(table = schema.table(), "sqlite table ready");
        Ok(())
    }

    async fn insert(
        &self,
        schema: &ModelSchema,
        attributes: &Attributes,
    ) -> Result<RecordId, RepoError> {
        check_attributes(schema, attributes)?;
        let table = quoted(schema.table())?;

        let sql = if schema.columns().is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES")
        } else {
            let columns = schema
                .columns()
                .iter()
                .map(|column| quoted(column))
                .collect::<Result<Vec<_>, _>>()?;
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {table} ({}) VALUES ({placeholders})",
                columns.join(", ")
            )
        };

        let mut query = sqlx::query(&sql);
        for column in schema.columns() {
            query = bind_value(query, attributes.get(column).unwrap_or(&StoredValue::Null));
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(result.last_insert_rowid())
    }

    async fn update(
        &self,
        schema: &ModelSchema,
        id: RecordId,
        attributes: &Attributes,
    ) -> Result<(), RepoError> {
        check_attributes(schema, attributes)?;
        if attributes.is_empty() {
            return match self.find(schema, id).await? {
                Some(_) => Ok(()),
                None => Err(RepoError::NotFound),
            };
        }

        let table = quoted(schema.table())?;
        let assignments = attributes
            .keys()
            .map(|column| Ok(format!("{} = ?", quoted(column)?)))
            .collect::<Result<Vec<_>, RepoError>>()?;
        let sql = format!("UPDATE {table} SET {} WHERE id = ?", assignments.join(", "));

        let mut query = sqlx::query(&sql);
        for value in attributes.values() {
            query = bind_value(query, value);
        }

        let result = query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find(
        &self,
        schema: &ModelSchema,
        id: RecordId,
    ) -> Result<Option<Attributes>, RepoError> {
        let table = quoted(schema.table())?;
        let mut columns = vec!["id".to_string()];
        for column in schema.columns() {
            columns.push(quoted(column)?);
        }
        let sql = format!("SELECT {} FROM {table} WHERE id = ?", columns.join(", "));

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(|row| decode_row(schema, &row)).transpose()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value mapping
// ─────────────────────────────────────────────────────────────────────────────

fn bind_value<'q>(query: Query<'q>, value: &StoredValue) -> Query<'q> {
    match value {
        StoredValue::Null => query.bind(None::<String>),
        StoredValue::Integer(v) => query.bind(*v),
        StoredValue::Real(v) => query.bind(*v),
        StoredValue::Text(v) => query.bind(v.clone()),
    }
}

fn decode_row(schema: &ModelSchema, row: &SqliteRow) -> Result<Attributes, RepoError> {
    let mut attributes = Attributes::new();
    // index 0 is the id
    for (index, column) in schema.columns().iter().enumerate() {
        let index = index + 1;
        let raw = row
            .try_get_raw(index)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let value = decode_value(row, index, raw, column)?;
        attributes.insert(column.clone(), value);
    }
    Ok(attributes)
}

fn decode_value(
    row: &SqliteRow,
    index: usize,
    raw: SqliteValueRef<'_>,
    column: &str,
) -> Result<StoredValue, RepoError> {
    if raw.is_null() {
        return Ok(StoredValue::Null);
    }
    let value = match raw.type_info().name() {
        "INTEGER" => row.try_get::<i64, _>(index).map(StoredValue::Integer),
        "REAL" => row.try_get::<f64, _>(index).map(StoredValue::Real),
        "TEXT" => row.try_get::<String, _>(index).map(StoredValue::Text),
        other => {
            return Err(RepoError::Database(format!(
                "column {column} holds unsupported {other} value"
            )));
        }
    };
    value.map_err(|e| RepoError::Database(e.to_string()))
}
