//! # Number Setting Repository
//!
//! Persistence for per-(branch, document type) numbering configuration.
//!
//! ## Counter Claim
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │            One write transaction per Auto-mode number                   │
//! │                                                                         │
//! │  Request A                          Request B                           │
//! │  ─────────                          ─────────                           │
//! │  BEGIN                              BEGIN                               │
//! │  lock_auto() → UPDATE ... RETURNING                                    │
//! │    (takes the write lock)           lock_auto() → waits (busy_timeout) │
//! │    next_number = 7                    │                                 │
//! │  store_counter(8)                     │                                 │
//! │  COMMIT ─────────────────────────────►│ next_number = 8                │
//! │                                     store_counter(9), COMMIT           │
//! │                                                                         │
//! │  The read of the counter and its advance sit in the same write         │
//! │  transaction, so a number is never handed out twice and nobody has     │
//! │  to retry.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ledger_core::{CounterState, DocType, NumberSetting, SettingUpdate};

/// Repository for number setting operations.
#[derive(Debug, Clone)]
pub struct NumberSettingRepository {
    pool: SqlitePool,
}

impl NumberSettingRepository {
    /// Creates a new NumberSettingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NumberSettingRepository { pool }
    }

    /// Gets the setting for a branch and document type.
    ///
    /// ## Returns
    /// * `Ok(None)` - numbering not yet configured for this pair
    pub async fn find(&self, branch_id: &str, doc_type: DocType) -> DbResult<Option<NumberSetting>> {
        let setting = sqlx::query_as::<_, NumberSetting>(
            r#"
            SELECT
                id, branch_id, doc_type, mode, prefix,
                next_number, next_number_raw, created_at, updated_at
            FROM number_settings
            WHERE branch_id = ?1 AND doc_type = ?2
            "#,
        )
        .bind(branch_id)
        .bind(doc_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Lists every configured setting of a branch.
    pub async fn list_for_branch(&self, branch_id: &str) -> DbResult<Vec<NumberSetting>> {
        let settings = sqlx::query_as::<_, NumberSetting>(
            r#"
            SELECT
                id, branch_id, doc_type, mode, prefix,
                next_number, next_number_raw, created_at, updated_at
            FROM number_settings
            WHERE branch_id = ?1
            ORDER BY doc_type
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Creates the setting, or overwrites its mutable fields if it exists.
    ///
    /// One statement keyed on `UNIQUE (branch_id, doc_type)`, so concurrent
    /// upserts never create duplicates and different doc types of one branch
    /// never touch each other's row. `id` and `created_at` survive updates.
    pub async fn upsert(
        &self,
        branch_id: &str,
        doc_type: DocType,
        update: &SettingUpdate,
    ) -> DbResult<NumberSetting> {
        let now = Utc::now();

        debug!(
            branch_id = %branch_id,
            doc_type = %doc_type,
            mode = %update.mode,
            "Upserting number setting"
        );

        let setting = sqlx::query_as::<_, NumberSetting>(
            r#"
            INSERT INTO number_settings (
                id, branch_id, doc_type, mode, prefix,
                next_number, next_number_raw, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?8
            )
            ON CONFLICT (branch_id, doc_type) DO UPDATE SET
                mode = excluded.mode,
                prefix = excluded.prefix,
                next_number = excluded.next_number,
                next_number_raw = excluded.next_number_raw,
                updated_at = excluded.updated_at
            RETURNING
                id, branch_id, doc_type, mode, prefix,
                next_number, next_number_raw, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(branch_id)
        .bind(doc_type)
        .bind(update.mode)
        .bind(&update.prefix)
        .bind(update.next_number)
        .bind(&update.next_number_raw)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Loads the Auto-mode setting and takes the SQLite write lock.
    ///
    /// Must be the first statement of the transaction on `conn`: the row is
    /// touched (`updated_at`) so SQLite starts a write transaction here,
    /// and concurrent claimers queue on the busy timeout instead of reading
    /// a counter that is about to move.
    ///
    /// ## Returns
    /// * `Ok(None)` - not configured, or configured in Manual mode
    pub async fn lock_auto(
        conn: &mut SqliteConnection,
        branch_id: &str,
        doc_type: DocType,
    ) -> DbResult<Option<NumberSetting>> {
        let setting = sqlx::query_as::<_, NumberSetting>(
            r#"
            UPDATE number_settings SET
                updated_at = ?3
            WHERE branch_id = ?1
              AND doc_type = ?2
              AND mode = 'Auto'
            RETURNING
                id, branch_id, doc_type, mode, prefix,
                next_number, next_number_raw, created_at, updated_at
            "#,
        )
        .bind(branch_id)
        .bind(doc_type)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

        Ok(setting)
    }

    /// Stores the counter that follows an issued number.
    ///
    /// Only meaningful inside the transaction opened by [`Self::lock_auto`].
    pub async fn store_counter(
        conn: &mut SqliteConnection,
        branch_id: &str,
        doc_type: DocType,
        next: &CounterState,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE number_settings SET
                next_number = ?3,
                next_number_raw = ?4,
                updated_at = ?5
            WHERE branch_id = ?1 AND doc_type = ?2 AND mode = 'Auto'
            "#,
        )
        .bind(branch_id)
        .bind(doc_type)
        .bind(next.numeric)
        .bind(&next.raw)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "NumberSetting",
                format!("{branch_id}/{doc_type}"),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use ledger_core::NumberMode;

    async fn repo() -> NumberSettingRepository {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .number_settings()
    }

    fn auto(prefix: &str, next: i64, raw: &str) -> SettingUpdate {
        SettingUpdate {
            mode: NumberMode::Auto,
            prefix: prefix.to_string(),
            next_number: Some(next),
            next_number_raw: Some(raw.to_string()),
        }
    }

    #[tokio::test]
    async fn test_find_absent() {
        let repo = repo().await;
        assert!(repo.find("branch-1", DocType::Invoice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates_in_place() {
        let repo = repo().await;

        let created = repo
            .upsert("branch-1", DocType::Invoice, &auto("INV-", 7, "00007"))
            .await
            .unwrap();
        assert_eq!(created.mode, NumberMode::Auto);
        assert_eq!(created.next_number, Some(7));
        assert_eq!(created.next_number_raw.as_deref(), Some("00007"));

        let manual = SettingUpdate {
            mode: NumberMode::Manual,
            prefix: "INV-".to_string(),
            next_number: None,
            next_number_raw: None,
        };
        let updated = repo
            .upsert("branch-1", DocType::Invoice, &manual)
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.mode, NumberMode::Manual);
        assert_eq!(updated.next_number, None);

        let found = repo.find("branch-1", DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(found, updated);
    }

    #[tokio::test]
    async fn test_doc_types_and_branches_are_independent() {
        let repo = repo().await;

        repo.upsert("branch-1", DocType::Invoice, &auto("INV-", 1, "001"))
            .await
            .unwrap();
        repo.upsert("branch-1", DocType::Quote, &auto("QT-", 50, "050"))
            .await
            .unwrap();
        repo.upsert("branch-2", DocType::Invoice, &auto("B2-", 9, "9"))
            .await
            .unwrap();

        let branch_one = repo.list_for_branch("branch-1").await.unwrap();
        assert_eq!(branch_one.len(), 2);

        let invoice = repo.find("branch-1", DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(invoice.next_number, Some(1));
        let other = repo.find("branch-2", DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(other.prefix, "B2-");
    }

    #[tokio::test]
    async fn test_lock_and_store_counter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.number_settings();
        repo.upsert("branch-1", DocType::Invoice, &auto("INV-", 7, "00007"))
            .await
            .unwrap();

        let mut tx = repo.pool.begin().await.unwrap();
        let seen = NumberSettingRepository::lock_auto(&mut tx, "branch-1", DocType::Invoice)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(seen.next_number, Some(7));

        let next = CounterState::of(&seen).advance().unwrap();
        NumberSettingRepository::store_counter(&mut tx, "branch-1", DocType::Invoice, &next)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let stored = repo.find("branch-1", DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(stored.next_number, Some(8));
        assert_eq!(stored.next_number_raw.as_deref(), Some("00008"));
        assert_eq!(stored.id, seen.id);
    }

    #[tokio::test]
    async fn test_rolled_back_claim_keeps_counter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.number_settings();
        repo.upsert("branch-1", DocType::Invoice, &auto("INV-", 7, "00007"))
            .await
            .unwrap();

        {
            let mut tx = repo.pool.begin().await.unwrap();
            let seen = NumberSettingRepository::lock_auto(&mut tx, "branch-1", DocType::Invoice)
                .await
                .unwrap()
                .unwrap();
            let next = CounterState::of(&seen).advance().unwrap();
            NumberSettingRepository::store_counter(&mut tx, "branch-1", DocType::Invoice, &next)
                .await
                .unwrap();
            tx.rollback().await.unwrap();
        }

        let stored = repo.find("branch-1", DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(stored.next_number, Some(7));
    }

    #[tokio::test]
    async fn test_lock_auto_skips_manual_and_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let manual = SettingUpdate {
            mode: NumberMode::Manual,
            prefix: "QT-".to_string(),
            next_number: None,
            next_number_raw: None,
        };
        let repo = db.number_settings();
        repo.upsert("branch-1", DocType::Quote, &manual).await.unwrap();

        let mut conn = repo.pool.acquire().await.unwrap();
        for doc_type in [DocType::Quote, DocType::Invoice] {
            assert!(NumberSettingRepository::lock_auto(&mut conn, "branch-1", doc_type)
                .await
                .unwrap()
                .is_none());
        }
    }
}
