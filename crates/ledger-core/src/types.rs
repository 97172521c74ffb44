//! # Domain Types
//!
//! Types shared by every layer of the numbering subsystem.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    DocType      │   │   NumberMode    │   │ DocumentCollection  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  QUOTE          │   │  Auto           │   │  table + id column  │   │
//! │  │  INVOICE  ...   │   │  Manual         │   │  invoices/invoice_id│   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────┐   ┌─────────────────────────────┐     │
//! │  │       NumberSetting         │   │       NumberPreview         │     │
//! │  │  ─────────────────────────  │   │  ─────────────────────────  │     │
//! │  │  (branch_id, doc_type) key  │   │  generated_id (not stored)  │     │
//! │  │  mode, prefix               │   │  prefix, next_number(_raw)  │     │
//! │  │  next_number(_raw)          │   │  mode                       │     │
//! │  └─────────────────────────────┘   └─────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Document Type
// =============================================================================

/// Category of business document that carries a human-readable number.
///
/// Serialized as `SCREAMING_SNAKE_CASE` both on the wire and in the
/// `number_settings.doc_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum DocType {
    Quote,
    SaleOrder,
    Invoice,
    CreditNote,
    VendorCredit,
    Bill,
    PurchaseOrder,
}

impl DocType {
    /// Every document type, in declaration order.
    pub const ALL: [DocType; 7] = [
        DocType::Quote,
        DocType::SaleOrder,
        DocType::Invoice,
        DocType::CreditNote,
        DocType::VendorCredit,
        DocType::Bill,
        DocType::PurchaseOrder,
    ];

    /// Prefix used when an administrator does not supply one.
    ///
    /// ## Default Table
    /// ```text
    /// QUOTE       → "QT-"
    /// SALE_ORDER  → "SO-"
    /// INVOICE     → "INV-"
    /// (others)    → "DOC-"
    /// ```
    pub const fn default_prefix(self) -> &'static str {
        match self {
            DocType::Quote => "QT-",
            DocType::SaleOrder => "SO-",
            DocType::Invoice => "INV-",
            DocType::CreditNote => "DOC-",
            DocType::VendorCredit => "DOC-",
            DocType::Bill => "DOC-",
            DocType::PurchaseOrder => "DOC-",
        }
    }

    /// Wire/database name, e.g. `"SALE_ORDER"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            DocType::Quote => "QUOTE",
            DocType::SaleOrder => "SALE_ORDER",
            DocType::Invoice => "INVOICE",
            DocType::CreditNote => "CREDIT_NOTE",
            DocType::VendorCredit => "VENDOR_CREDIT",
            DocType::Bill => "BILL",
            DocType::PurchaseOrder => "PURCHASE_ORDER",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DocType::ALL
            .into_iter()
            .find(|doc_type| doc_type.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownDocType(wanted.to_string()))
    }
}

// =============================================================================
// Number Mode
// =============================================================================

/// How numbers are produced for a (branch, doc type) pair.
///
/// ## Modes
/// ```text
/// Auto   → prefix + zero-padded counter, counter advances on each use
/// Manual → caller supplies the id, only uniqueness is checked
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "PascalCase"))]
#[ts(export)]
pub enum NumberMode {
    Auto,
    Manual,
}

impl NumberMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            NumberMode::Auto => "Auto",
            NumberMode::Manual => "Manual",
        }
    }
}

impl fmt::Display for NumberMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumberMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Auto" => Ok(NumberMode::Auto),
            "Manual" => Ok(NumberMode::Manual),
            "" => Err(ValidationError::Required {
                field: "mode".to_string(),
            }),
            other => Err(ValidationError::InvalidMode(other.to_string())),
        }
    }
}

// =============================================================================
// Number Setting
// =============================================================================

/// Persisted numbering configuration for one branch and document type.
///
/// ## Padding Width
/// `next_number_raw` is the authoritative source of the padding width:
/// `"00007"` means every generated number is padded to at least 5 digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NumberSetting {
    /// Surrogate key (UUID v4).
    pub id: String,

    /// Owning branch. Immutable.
    pub branch_id: String,

    /// Document category. Immutable.
    pub doc_type: DocType,

    pub mode: NumberMode,

    /// Text placed before the padded counter, e.g. `"INV-"`.
    pub prefix: String,

    /// Next counter value. `None` in Manual mode.
    #[ts(type = "number | null")]
    pub next_number: Option<i64>,

    /// Zero-padded string form of `next_number`. `None` in Manual mode.
    pub next_number_raw: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl NumberSetting {
    #[inline]
    pub fn is_auto(&self) -> bool {
        self.mode == NumberMode::Auto
    }
}

/// Validated field values written by an administrator upsert.
///
/// Produced by [`crate::numbering::plan_setting_update`]; the database layer
/// stores it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingUpdate {
    pub mode: NumberMode,
    pub prefix: String,
    pub next_number: Option<i64>,
    pub next_number_raw: Option<String>,
}

// =============================================================================
// Number Preview
// =============================================================================

/// What the next Auto-mode number would look like. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NumberPreview {
    pub doc_type: DocType,
    pub generated_id: String,
    pub prefix: String,
    #[ts(type = "number")]
    pub next_number: i64,
    pub next_number_raw: String,
    pub mode: NumberMode,
}

// =============================================================================
// Document Collection
// =============================================================================

/// A target collection that stores numbered documents.
///
/// Each variant maps to exactly one table and the column holding the
/// human-readable number. Table and column names are compile-time constants,
/// which is what makes them safe to splice into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCollection {
    Quotation,
    SaleOrder,
    Invoice,
    CreditNote,
    VendorCredit,
    BillingRecord,
    PurchaseOrder,
}

impl DocumentCollection {
    pub const ALL: [DocumentCollection; 7] = [
        DocumentCollection::Quotation,
        DocumentCollection::SaleOrder,
        DocumentCollection::Invoice,
        DocumentCollection::CreditNote,
        DocumentCollection::VendorCredit,
        DocumentCollection::BillingRecord,
        DocumentCollection::PurchaseOrder,
    ];

    /// Table name, also used as the URL segment.
    pub const fn table(self) -> &'static str {
        match self {
            DocumentCollection::Quotation => "quotations",
            DocumentCollection::SaleOrder => "sale_orders",
            DocumentCollection::Invoice => "invoices",
            DocumentCollection::CreditNote => "credit_notes",
            DocumentCollection::VendorCredit => "vendor_credits",
            DocumentCollection::BillingRecord => "billing_records",
            DocumentCollection::PurchaseOrder => "purchase_orders",
        }
    }

    /// Column holding the generated document number.
    pub const fn id_column(self) -> &'static str {
        match self {
            DocumentCollection::Quotation => "quote_id",
            DocumentCollection::SaleOrder => "sale_order_id",
            DocumentCollection::Invoice => "invoice_id",
            DocumentCollection::CreditNote => "credit_note_id",
            DocumentCollection::VendorCredit => "vendor_credit_id",
            DocumentCollection::BillingRecord => "bill_id",
            DocumentCollection::PurchaseOrder => "purchase_order_id",
        }
    }

    /// Numbering sequence used when documents of this collection are created.
    pub const fn doc_type(self) -> DocType {
        match self {
            DocumentCollection::Quotation => DocType::Quote,
            DocumentCollection::SaleOrder => DocType::SaleOrder,
            DocumentCollection::Invoice => DocType::Invoice,
            DocumentCollection::CreditNote => DocType::CreditNote,
            DocumentCollection::VendorCredit => DocType::VendorCredit,
            DocumentCollection::BillingRecord => DocType::Bill,
            DocumentCollection::PurchaseOrder => DocType::PurchaseOrder,
        }
    }
}

impl fmt::Display for DocumentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for DocumentCollection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DocumentCollection::ALL
            .into_iter()
            .find(|collection| collection.table().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownCollection(wanted.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
