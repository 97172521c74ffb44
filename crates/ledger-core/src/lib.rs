//! # ledger-core: Pure Numbering Logic for Ledgerline
//!
//! Decides what a branch's next quote, invoice, sale-order or credit-note
//! number is, without touching storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ledgerline Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  ledger-api (axum HTTP)                         │   │
//! │  │   POST /number-setting, GET /number/next, POST /documents/..   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ledger-db (NumberingService, repos)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ledger-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌────────────┐               │   │
//! │  │   │   types   │  │  numbering  │  │ validation │               │   │
//! │  │   │  DocType  │  │ CounterState│  │ next number│               │   │
//! │  │   │ Setting   │  │  preview    │  │ manual id  │               │   │
//! │  │   └───────────┘  └─────────────┘  └────────────┘               │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (DocType, NumberMode, NumberSetting, ...)
//! - [`numbering`] - Padding, counter advancement, previews
//! - [`validation`] - Administrator and caller input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ledger_core::numbering::CounterState;
//!
//! let counter = CounterState::from_stored(Some(7), Some("00007"));
//! assert_eq!(counter.document_number("INV-"), "INV-00007");
//! assert_eq!(counter.advance().unwrap().raw, "00008");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod numbering;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use numbering::{CounterState, DEFAULT_NEXT_NUMBER_RAW};
pub use types::*;
