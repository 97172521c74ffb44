//! # ledger-db: Database Layer for Ledgerline
//!
//! This crate provides storage and the numbering service for Ledgerline.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ledgerline Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /documents/invoices)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ledger-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  Numbering    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  Service      │    │               │    │  (embedded)  │  │   │
//! │  │   │               │───►│ NumberSetting │    │ 001_...sql   │  │   │
//! │  │   │ generate()    │    │ Document      │    │ 002_...sql   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                    │                               │   │
//! │  │           └──────── Database (pool.rs) ────────┘              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and numbering error types
//! - [`repository`] - Number settings and document collections
//! - [`numbering`] - Administration and generation of document numbers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_core::{DocType, DocumentCollection};
//! use ledger_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/ledger.db")).await?;
//! let numbering = db.numbering();
//!
//! numbering
//!     .upsert_setting("branch-1", DocType::Invoice, Some("Auto"), None, Some("00001"))
//!     .await?;
//!
//! let doc = numbering
//!     .create_document("branch-1", DocumentCollection::Invoice, None, &payload)
//!     .await?;
//! assert_eq!(doc.document_number, "INV-00001");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod numbering;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, NumberingError, NumberingResult};
pub use numbering::NumberingService;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::document::{DocumentRepository, StoredDocument};
pub use repository::number_setting::NumberSettingRepository;
