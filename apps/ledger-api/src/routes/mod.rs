//! HTTP handlers.
//!
//! - [`settings`] - numbering administration and preview
//! - [`documents`] - numbered document creation and soft delete
//! - [`health`] - liveness

pub mod documents;
pub mod health;
pub mod settings;

use serde::Deserialize;

use ledger_core::{DocType, ValidationError};

/// `?branchId=` query shared by several routes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchQuery {
    pub branch_id: Option<String>,
}

/// Parses a required `docType` field.
pub(crate) fn parse_doc_type(value: Option<&str>) -> Result<DocType, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Err(ValidationError::Required {
            field: "docType".to_string(),
        }),
        Some(raw) => raw.parse(),
    }
}
