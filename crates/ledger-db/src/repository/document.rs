//! # Document Repository
//!
//! Numbered business documents (quotations, invoices, sale orders, ...).
//!
//! Every collection table has the same shape apart from the name of the
//! number column, so one repository parameterised by
//! [`DocumentCollection`] serves all of them. Table and column names come
//! from the closed enum, never from user input.
//!
//! ## Soft Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  invoices                                                               │
//! │  ┌──────────┬───────────┬────────────┬────────────┐                    │
//! │  │ id       │ branch_id │ invoice_id │ is_deleted │                    │
//! │  ├──────────┼───────────┼────────────┼────────────┤                    │
//! │  │ 9f1c...  │ B         │ INV-00007  │ 1          │ ← released         │
//! │  │ 2ab4...  │ B         │ INV-00007  │ 0          │ ← live, unique     │
//! │  └──────────┴───────────┴────────────┴────────────┘                    │
//! │                                                                         │
//! │  UNIQUE (branch_id, invoice_id) WHERE is_deleted = 0                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ledger_core::DocumentCollection;

/// A stored document as seen by the numbering subsystem.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: String,
    pub collection: DocumentCollection,
    pub branch_id: String,
    /// Human-readable number (the collection's id column).
    pub document_number: String,
    pub payload: serde_json::Value,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    branch_id: String,
    document_number: String,
    payload: String,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self, collection: DocumentCollection) -> DbResult<StoredDocument> {
        let payload = serde_json::from_str(&self.payload).map_err(|e| DbError::Corrupt {
            entity: collection.table().to_string(),
            reason: e.to_string(),
        })?;

        Ok(StoredDocument {
            id: self.id,
            collection,
            branch_id: self.branch_id,
            document_number: self.document_number,
            payload,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for one numbered document collection.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
    collection: DocumentCollection,
}

impl DocumentRepository {
    /// Creates a repository bound to `collection`.
    pub fn new(pool: SqlitePool, collection: DocumentCollection) -> Self {
        DocumentRepository { pool, collection }
    }

    /// Checks whether a live document of the branch already uses `number`.
    pub async fn exists_active(&self, branch_id: &str, number: &str) -> DbResult<bool> {
        let mut conn = self.pool.acquire().await?;
        self.exists_active_in(&mut conn, branch_id, number).await
    }

    /// Same check as [`Self::exists_active`], on a caller-held connection
    /// (used inside the counter claim transaction).
    pub async fn exists_active_in(
        &self,
        conn: &mut SqliteConnection,
        branch_id: &str,
        number: &str,
    ) -> DbResult<bool> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {table} WHERE branch_id = ?1 AND {column} = ?2 AND is_deleted = 0)",
            table = self.collection.table(),
            column = self.collection.id_column(),
        );

        let found: i64 = sqlx::query_scalar(&sql)
            .bind(branch_id)
            .bind(number)
            .fetch_one(&mut *conn)
            .await?;

        Ok(found != 0)
    }

    /// Inserts a new live document.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - a live document of the branch
    ///   already has this number
    pub async fn insert(
        &self,
        branch_id: &str,
        number: &str,
        payload: &serde_json::Value,
    ) -> DbResult<StoredDocument> {
        let now = Utc::now();
        let document = StoredDocument {
            id: Uuid::new_v4().to_string(),
            collection: self.collection,
            branch_id: branch_id.to_string(),
            document_number: number.to_string(),
            payload: payload.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        debug!(
            collection = %self.collection,
            branch_id = %branch_id,
            number = %number,
            "Inserting document"
        );

        let sql = format!(
            "INSERT INTO {table} (id, branch_id, {column}, payload, is_deleted, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
            table = self.collection.table(),
            column = self.collection.id_column(),
        );

        sqlx::query(&sql)
            .bind(&document.id)
            .bind(&document.branch_id)
            .bind(&document.document_number)
            .bind(payload.to_string())
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => {
                    DbError::duplicate(self.collection.id_column(), number)
                }
                other => other,
            })?;

        Ok(document)
    }

    /// Gets a document (live or deleted) of a branch by its UUID.
    pub async fn get(&self, branch_id: &str, id: &str) -> DbResult<Option<StoredDocument>> {
        let sql = format!(
            "SELECT id, branch_id, {column} AS document_number, payload, is_deleted, created_at, updated_at \
             FROM {table} WHERE branch_id = ?1 AND id = ?2",
            table = self.collection.table(),
            column = self.collection.id_column(),
        );

        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(branch_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row.into_document(self.collection)).transpose()
    }

    /// Marks a live document as deleted, releasing its number.
    pub async fn soft_delete(&self, branch_id: &str, id: &str) -> DbResult<()> {
        debug!(collection = %self.collection, id = %id, "Soft-deleting document");

        let sql = format!(
            "UPDATE {table} SET is_deleted = 1, updated_at = ?3 \
             WHERE branch_id = ?1 AND id = ?2 AND is_deleted = 0",
            table = self.collection.table(),
        );

        let result = sqlx::query(&sql)
            .bind(branch_id)
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(self.collection.table(), id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
