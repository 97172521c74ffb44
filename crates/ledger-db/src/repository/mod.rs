//! # Repository Module
//!
//! Database repository implementations for Ledgerline.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  NumberingService                                                      │
//! │       │                                                                 │
//! │       ├── NumberSettingRepository::lock_auto(tx, branch, INVOICE)     │
//! │       ├── documents(Invoice).exists_active_in(tx, branch, "INV-00007") │
//! │       └── NumberSettingRepository::store_counter(tx, branch, ..)     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`NumberSettingRepository`](number_setting::NumberSettingRepository) - numbering configuration
//! - [`DocumentRepository`](document::DocumentRepository) - numbered document collections

pub mod document;
pub mod number_setting;
