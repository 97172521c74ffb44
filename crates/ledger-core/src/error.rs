//! # Error Types
//!
//! Domain-specific error types for ledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledger-core errors (this file)                                        │
//! │  ├── CoreError        - Numbering rule violations (conflicts)          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ledger-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── NumberingError   - CoreError | DbError from the service           │
//! │                                                                         │
//! │  HTTP errors (ledger-api)                                              │
//! │  └── ApiError         - What the client sees (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → NumberingError → ApiError         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Messages
//! The display strings of the variants below are shown to end users
//! verbatim, so they are kept short and stable.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Numbering rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller-supplied (manual) document number is already in use.
    ///
    /// ## When This Occurs
    /// - Manual mode, and a non-deleted document of the same branch
    ///   already carries the trimmed id
    /// - Two manual inserts raced and the unique index rejected the second
    #[error("This document ID already exists")]
    DuplicateDocumentId { id: String },

    /// The number produced from the Auto-mode counter is already in use.
    ///
    /// ## When This Occurs
    /// - An administrator lowered `nextNumber` below ids already issued
    /// - Documents were created manually with ids in the Auto range
    ///
    /// The generator does not retry: the setting needs attention.
    #[error("Generated document ID already exists")]
    GeneratedIdTaken { id: String },

    /// The counter cannot be advanced without overflowing.
    #[error("Document counter is exhausted")]
    CounterExhausted,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true for the errors that mean "this id collides".
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            CoreError::DuplicateDocumentId { .. }
                | CoreError::GeneratedIdTaken { .. }
                | CoreError::CounterExhausted
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when administrator or caller input doesn't meet
/// requirements. They are raised before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Mode string is neither Auto nor Manual.
    #[error("Mode must be Auto or Manual, got '{0}'")]
    InvalidMode(String),

    /// Unknown document type string.
    #[error("Unknown document type: '{0}'")]
    UnknownDocType(String),

    /// Unknown target collection string.
    #[error("Unknown document collection: '{0}'")]
    UnknownCollection(String),

    /// Auto-mode starting number is missing, non-numeric, or below 1.
    #[error("Next number must be a number >= 1")]
    InvalidNextNumber,

    /// Manual mode (or unconfigured numbering) without a usable id.
    #[error("Document ID is required in manual mode")]
    ManualIdRequired,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
