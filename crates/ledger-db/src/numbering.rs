//! # Numbering Service
//!
//! Administration and generation of branch-scoped document numbers.
//!
//! ## Generation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_document(branch, Invoice, manual_id?, payload)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  generate(branch, INVOICE, manual_id?, Invoice)                        │
//! │       │                                                                 │
//! │       ├── setting Auto ─────────────────────────────┐                  │
//! │       │                                              ▼                  │
//! │       │                          BEGIN; lock_auto (write lock)         │
//! │       │                          candidate = prefix + pad(counter)     │
//! │       │                          live doc with candidate? → Conflict   │
//! │       │                          store_counter(next); COMMIT           │
//! │       │                          → candidate                           │
//! │       │                                                                 │
//! │       └── Manual / not configured ──────────────────┐                  │
//! │                                                      ▼                  │
//! │                                  manual_id trimmed, non-empty          │
//! │                                  live doc with id? → Conflict          │
//! │                                  → manual_id                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  documents(Invoice).insert(branch, number, payload)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, NumberingError, NumberingResult};
use crate::repository::document::{DocumentRepository, StoredDocument};
use crate::repository::number_setting::NumberSettingRepository;
use ledger_core::numbering::{plan_setting_update, preview};
use ledger_core::validation::{validate_branch_id, validate_manual_id};
use ledger_core::{
    CoreError, CounterState, DocType, DocumentCollection, NumberMode, NumberPreview,
    NumberSetting, ValidationError,
};

/// Numbering administration and generation for all branches.
#[derive(Debug, Clone)]
pub struct NumberingService {
    pool: SqlitePool,
    settings: NumberSettingRepository,
}

impl NumberingService {
    pub fn new(pool: SqlitePool) -> Self {
        NumberingService {
            settings: NumberSettingRepository::new(pool.clone()),
            pool,
        }
    }

    fn documents(&self, collection: DocumentCollection) -> DocumentRepository {
        DocumentRepository::new(self.pool.clone(), collection)
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Configures numbering for a branch and document type.
    ///
    /// ## Rules
    /// - `branch_id` and `mode` are required
    /// - Auto: `next_number` must be digits with value >= 1; its string form
    ///   (and so its padding width) is stored as given
    /// - Manual: the counter is cleared
    /// - Blank prefix falls back to the doc type default
    ///
    /// Nothing is written when validation fails.
    pub async fn upsert_setting(
        &self,
        branch_id: &str,
        doc_type: DocType,
        mode: Option<&str>,
        prefix: Option<&str>,
        next_number: Option<&str>,
    ) -> NumberingResult<NumberSetting> {
        let branch_id = validate_branch_id(branch_id)?;
        let mode: NumberMode = mode
            .ok_or_else(|| ValidationError::Required {
                field: "mode".to_string(),
            })?
            .parse()?;

        let update = plan_setting_update(doc_type, mode, prefix, next_number)?;
        let setting = self.settings.upsert(&branch_id, doc_type, &update).await?;

        info!(
            branch_id = %setting.branch_id,
            doc_type = %setting.doc_type,
            mode = %setting.mode,
            prefix = %setting.prefix,
            next_number_raw = ?setting.next_number_raw,
            "Number setting saved"
        );

        Ok(setting)
    }

    /// Lists the configured settings of a branch.
    pub async fn list_settings(&self, branch_id: &str) -> NumberingResult<Vec<NumberSetting>> {
        let branch_id = validate_branch_id(branch_id)?;
        Ok(self.settings.list_for_branch(&branch_id).await?)
    }

    /// Shows the next Auto-mode number without consuming it.
    pub async fn preview(&self, branch_id: &str, doc_type: DocType) -> NumberingResult<NumberPreview> {
        let branch_id = validate_branch_id(branch_id)?;
        let setting = self.settings.find(&branch_id, doc_type).await?;
        Ok(preview(doc_type, setting.as_ref()))
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Produces the number to stamp on a new document of `collection`.
    ///
    /// Auto mode advances the stored counter; Manual mode (and an
    /// unconfigured doc type) validates `manual_id` instead. Conflicts are
    /// reported, never retried.
    pub async fn generate(
        &self,
        branch_id: &str,
        doc_type: DocType,
        manual_id: Option<&str>,
        collection: DocumentCollection,
    ) -> NumberingResult<String> {
        let branch_id = validate_branch_id(branch_id)?;
        let documents = self.documents(collection);

        // Concurrent claimers wait here on the SQLite write lock, so the
        // counter read below is the one the UPDATE replaces.
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let Some(setting) = NumberSettingRepository::lock_auto(&mut tx, &branch_id, doc_type).await?
        else {
            tx.rollback().await.map_err(DbError::from)?;
            return self.accept_manual(&documents, &branch_id, manual_id).await;
        };

        let counter = CounterState::of(&setting);
        let candidate = counter.document_number(&setting.prefix);

        if documents.exists_active_in(&mut tx, &branch_id, &candidate).await? {
            tx.rollback().await.map_err(DbError::from)?;
            warn!(
                branch_id = %branch_id,
                doc_type = %doc_type,
                candidate = %candidate,
                "Generated number already in use"
            );
            return Err(CoreError::GeneratedIdTaken { id: candidate }.into());
        }

        let next = counter.advance()?;
        NumberSettingRepository::store_counter(&mut tx, &branch_id, doc_type, &next).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            branch_id = %branch_id,
            doc_type = %doc_type,
            number = %candidate,
            next_number_raw = %next.raw,
            "Document number issued"
        );

        Ok(candidate)
    }

    async fn accept_manual(
        &self,
        documents: &DocumentRepository,
        branch_id: &str,
        manual_id: Option<&str>,
    ) -> NumberingResult<String> {
        let id = validate_manual_id(manual_id)?;

        if documents.exists_active(branch_id, &id).await? {
            return Err(CoreError::DuplicateDocumentId { id }.into());
        }

        debug!(branch_id = %branch_id, number = %id, "Manual document number accepted");
        Ok(id)
    }

    /// Numbers and stores a new document.
    ///
    /// The number comes from the collection's own doc type. When generation
    /// fails nothing is written. A unique-index hit on insert (a concurrent
    /// request stored the same number first) is reported as a duplicate.
    pub async fn create_document(
        &self,
        branch_id: &str,
        collection: DocumentCollection,
        manual_id: Option<&str>,
        payload: &serde_json::Value,
    ) -> NumberingResult<StoredDocument> {
        let number = self
            .generate(branch_id, collection.doc_type(), manual_id, collection)
            .await?;

        let document = self
            .documents(collection)
            .insert(branch_id.trim(), &number, payload)
            .await
            .map_err(|e| -> NumberingError {
                match e {
                    DbError::UniqueViolation { value, .. } => {
                        CoreError::DuplicateDocumentId { id: value }.into()
                    }
                    other => other.into(),
                }
            })?;

        Ok(document)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use serde_json::json;
    use std::collections::HashSet;

    const BRANCH: &str = "branch-b";

    async fn service() -> (Database, NumberingService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = db.numbering();
        (db, service)
    }

    async fn configure_auto(service: &NumberingService, doc_type: DocType, prefix: &str, raw: &str) {
        service
            .upsert_setting(BRANCH, doc_type, Some("Auto"), Some(prefix), Some(raw))
            .await
            .unwrap();
    }

    fn is_validation(err: &NumberingError) -> bool {
        matches!(err, NumberingError::Core(CoreError::Validation(_)))
    }

    #[tokio::test]
    async fn test_auto_generation_advances_counter() {
        let (db, service) = service().await;
        configure_auto(&service, DocType::Invoice, "INV-", "00007").await;

        let number = service
            .generate(BRANCH, DocType::Invoice, None, DocumentCollection::Invoice)
            .await
            .unwrap();
        assert_eq!(number, "INV-00007");

        let setting = db
            .number_settings()
            .find(BRANCH, DocType::Invoice)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(setting.next_number, Some(8));
        assert_eq!(setting.next_number_raw.as_deref(), Some("00008"));
    }

    #[tokio::test]
    async fn test_sequential_generation_is_monotonic() {
        let (_db, service) = service().await;
        configure_auto(&service, DocType::SaleOrder, "SO-", "1").await;

        let mut previous = 0;
        for _ in 0..5 {
            let number = service
                .generate(BRANCH, DocType::SaleOrder, None, DocumentCollection::SaleOrder)
                .await
                .unwrap();
            let value: i64 = number.trim_start_matches("SO-").parse().unwrap();
            assert_eq!(value, previous + 1);
            previous = value;
        }
    }

    #[tokio::test]
    async fn test_padding_width_is_sticky() {
        let (db, service) = service().await;
        configure_auto(&service, DocType::Quote, "QT-", "0009").await;

        let number = service
            .generate(BRANCH, DocType::Quote, None, DocumentCollection::Quotation)
            .await
            .unwrap();
        assert_eq!(number, "QT-0009");

        let setting = db.number_settings().find(BRANCH, DocType::Quote).await.unwrap().unwrap();
        assert_eq!(setting.next_number_raw.as_deref(), Some("0010"));

        configure_auto(&service, DocType::Quote, "QT-", "0099").await;
        service
            .generate(BRANCH, DocType::Quote, None, DocumentCollection::Quotation)
            .await
            .unwrap();
        let setting = db.number_settings().find(BRANCH, DocType::Quote).await.unwrap().unwrap();
        assert_eq!(setting.next_number_raw.as_deref(), Some("0100"));
    }

    #[tokio::test]
    async fn test_auto_conflict_does_not_advance() {
        let (db, service) = service().await;
        configure_auto(&service, DocType::Invoice, "INV-", "00007").await;
        db.documents(DocumentCollection::Invoice)
            .insert(BRANCH, "INV-00007", &json!({}))
            .await
            .unwrap();

        let err = service
            .generate(BRANCH, DocType::Invoice, None, DocumentCollection::Invoice)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NumberingError::Core(CoreError::GeneratedIdTaken { ref id }) if id == "INV-00007"
        ));
        assert_eq!(err.to_string(), "Generated document ID already exists");

        let setting = db.number_settings().find(BRANCH, DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(setting.next_number, Some(7));
    }

    #[tokio::test]
    async fn test_manual_id_is_trimmed_and_unique() {
        let (_db, service) = service().await;
        service
            .upsert_setting(BRANCH, DocType::Invoice, Some("Manual"), None, None)
            .await
            .unwrap();

        let doc = service
            .create_document(BRANCH, DocumentCollection::Invoice, Some("  INV-99  "), &json!({}))
            .await
            .unwrap();
        assert_eq!(doc.document_number, "INV-99");

        let err = service
            .generate(BRANCH, DocType::Invoice, Some("INV-99"), DocumentCollection::Invoice)
            .await
            .unwrap_err();
        assert!(matches!(err, NumberingError::Core(CoreError::DuplicateDocumentId { .. })));
        assert_eq!(err.to_string(), "This document ID already exists");
    }

    #[tokio::test]
    async fn test_manual_id_required() {
        let (_db, service) = service().await;
        service
            .upsert_setting(BRANCH, DocType::Invoice, Some("Manual"), None, None)
            .await
            .unwrap();

        for missing in [None, Some(""), Some("   ")] {
            let err = service
                .generate(BRANCH, DocType::Invoice, missing, DocumentCollection::Invoice)
                .await
                .unwrap_err();
            assert!(is_validation(&err));
            assert_eq!(err.to_string(), "Document ID is required in manual mode");
        }
    }

    #[tokio::test]
    async fn test_unconfigured_behaves_as_manual() {
        let (db, service) = service().await;

        let err = service
            .generate(BRANCH, DocType::CreditNote, None, DocumentCollection::CreditNote)
            .await
            .unwrap_err();
        assert!(is_validation(&err));

        let number = service
            .generate(BRANCH, DocType::CreditNote, Some(" CN-1 "), DocumentCollection::CreditNote)
            .await
            .unwrap();
        assert_eq!(number, "CN-1");

        // Still unconfigured: manual generation never creates a setting
        assert!(db
            .number_settings()
            .find(BRANCH, DocType::CreditNote)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_preview_is_read_only_and_matches_generation() {
        let (db, service) = service().await;
        configure_auto(&service, DocType::Invoice, "INV-", "00041").await;

        for _ in 0..3 {
            let preview = service.preview(BRANCH, DocType::Invoice).await.unwrap();
            assert_eq!(preview.generated_id, "INV-00041");
        }
        let setting = db.number_settings().find(BRANCH, DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(setting.next_number, Some(41));

        let preview = service.preview(BRANCH, DocType::Invoice).await.unwrap();
        let number = service
            .generate(BRANCH, DocType::Invoice, None, DocumentCollection::Invoice)
            .await
            .unwrap();
        assert_eq!(preview.generated_id, number);
    }

    #[tokio::test]
    async fn test_preview_unconfigured_synthesizes_defaults() {
        let (db, service) = service().await;
        let preview = service.preview(BRANCH, DocType::SaleOrder).await.unwrap();
        assert_eq!(preview.generated_id, "SO-00001");
        assert_eq!(preview.next_number_raw, "00001");
        assert!(db.number_settings().list_for_branch(BRANCH).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_manual_upsert_uses_default_prefix() {
        let (_db, service) = service().await;
        let setting = service
            .upsert_setting(BRANCH, DocType::Quote, Some("Manual"), None, None)
            .await
            .unwrap();
        assert_eq!(setting.prefix, "QT-");
        assert_eq!(setting.next_number, None);
        assert_eq!(setting.next_number_raw, None);
    }

    #[tokio::test]
    async fn test_invalid_auto_upsert_writes_nothing() {
        let (db, service) = service().await;

        let err = service
            .upsert_setting(BRANCH, DocType::Invoice, Some("Auto"), None, Some("abc"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Next number must be a number >= 1");
        assert!(db.number_settings().find(BRANCH, DocType::Invoice).await.unwrap().is_none());

        // An existing setting is left untouched too
        configure_auto(&service, DocType::Invoice, "INV-", "005").await;
        assert!(service
            .upsert_setting(BRANCH, DocType::Invoice, Some("Auto"), Some("X-"), Some("0"))
            .await
            .is_err());
        let setting = db.number_settings().find(BRANCH, DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(setting.prefix, "INV-");
        assert_eq!(setting.next_number_raw.as_deref(), Some("005"));
    }

    #[tokio::test]
    async fn test_upsert_requires_branch_and_mode() {
        let (_db, service) = service().await;

        let err = service
            .upsert_setting("  ", DocType::Invoice, Some("Auto"), None, Some("1"))
            .await
            .unwrap_err();
        assert!(is_validation(&err));

        let err = service
            .upsert_setting(BRANCH, DocType::Invoice, None, None, Some("1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "mode is required");

        let err = service
            .upsert_setting(BRANCH, DocType::Invoice, Some("Sometimes"), None, None)
            .await
            .unwrap_err();
        assert!(is_validation(&err));
    }

    #[tokio::test]
    async fn test_soft_deleted_number_can_be_reused() {
        let (db, service) = service().await;
        let doc = service
            .create_document(BRANCH, DocumentCollection::VendorCredit, Some("VC-1"), &json!({}))
            .await
            .unwrap();
        db.documents(DocumentCollection::VendorCredit)
            .soft_delete(BRANCH, &doc.id)
            .await
            .unwrap();

        let again = service
            .create_document(BRANCH, DocumentCollection::VendorCredit, Some("VC-1"), &json!({}))
            .await
            .unwrap();
        assert_ne!(again.id, doc.id);
    }

    #[tokio::test]
    async fn test_create_document_auto() {
        let (_db, service) = service().await;
        configure_auto(&service, DocType::Bill, "BL-", "100").await;

        let first = service
            .create_document(BRANCH, DocumentCollection::BillingRecord, None, &json!({"vendor": "v1"}))
            .await
            .unwrap();
        let second = service
            .create_document(BRANCH, DocumentCollection::BillingRecord, Some("ignored"), &json!({}))
            .await
            .unwrap();

        assert_eq!(first.document_number, "BL-100");
        assert_eq!(second.document_number, "BL-101");
        assert_eq!(first.payload, json!({"vendor": "v1"}));
    }

    #[tokio::test]
    async fn test_long_prefix_and_manual_id_are_stored() {
        let (_db, service) = service().await;
        let setting = service
            .upsert_setting(
                BRANCH,
                DocType::Invoice,
                Some("Auto"),
                Some("ACME-HEADQUARTERS-INV-"),
                Some("1"),
            )
            .await
            .unwrap();
        assert_eq!(setting.prefix, "ACME-HEADQUARTERS-INV-");

        let doc = service
            .create_document(BRANCH, DocumentCollection::Invoice, None, &json!({}))
            .await
            .unwrap();
        assert_eq!(doc.document_number, "ACME-HEADQUARTERS-INV-1");

        let long_id = format!("PO-{}", "7".repeat(70));
        let doc = service
            .create_document(BRANCH, DocumentCollection::PurchaseOrder, Some(&long_id), &json!({}))
            .await
            .unwrap();
        assert_eq!(doc.document_number, long_id);
    }

    #[tokio::test]
    async fn test_mode_must_match_exactly() {
        let (db, service) = service().await;

        for mode in ["auto", "MANUAL", " Auto "] {
            let err = service
                .upsert_setting(BRANCH, DocType::Invoice, Some(mode), None, Some("1"))
                .await
                .unwrap_err();
            assert!(is_validation(&err));
        }
        assert!(db.number_settings().find(BRANCH, DocType::Invoice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generation_after_conflict_still_proceeds() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("ledger.db")).max_connections(2))
            .await
            .unwrap();
        let service = db.numbering();
        configure_auto(&service, DocType::Invoice, "INV-", "1").await;
        db.documents(DocumentCollection::Invoice)
            .insert(BRANCH, "INV-1", &json!({}))
            .await
            .unwrap();

        // The rejected claim must release its write lock
        assert!(service
            .generate(BRANCH, DocType::Invoice, None, DocumentCollection::Invoice)
            .await
            .is_err());
        configure_auto(&service, DocType::Invoice, "INV-", "2").await;
        let number = service
            .generate(BRANCH, DocType::Invoice, None, DocumentCollection::Invoice)
            .await
            .unwrap();
        assert_eq!(number, "INV-2");
    }

    #[tokio::test]
    async fn test_concurrent_generation_never_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("ledger.db")).max_connections(4))
            .await
            .unwrap();
        let service = db.numbering();
        configure_auto(&service, DocType::Invoice, "INV-", "0001").await;

        const REQUESTS: usize = 64;
        let tasks: Vec<_> = (0..REQUESTS)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .generate(BRANCH, DocType::Invoice, None, DocumentCollection::Invoice)
                        .await
                })
            })
            .collect();

        let mut issued = HashSet::new();
        for task in tasks {
            let number = task
                .await
                .unwrap()
                .unwrap_or_else(|e| panic!("generation failed under load: {e}"));
            assert!(issued.insert(number), "number issued twice");
        }
        assert_eq!(issued.len(), REQUESTS);
        for n in 1..=REQUESTS {
            assert!(issued.contains(&format!("INV-{n:04}")));
        }

        let setting = db.number_settings().find(BRANCH, DocType::Invoice).await.unwrap().unwrap();
        assert_eq!(setting.next_number, Some(65));
        assert_eq!(setting.next_number_raw.as_deref(), Some("0065"));
    }
}
