//! Numbered document creation and soft delete.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use ledger_core::DocumentCollection;
use ledger_core::validation::validate_branch_id;
use ledger_db::StoredDocument;

use super::BranchQuery;
use crate::error::ApiResult;
use crate::AppState;

/// Body of `POST /documents/{collection}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub branch_id: Option<String>,
    /// Only read when the doc type is in Manual mode (or unconfigured).
    pub manual_id: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// `POST /documents/{collection}`
pub async fn create_document(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StoredDocument>)> {
    let collection: DocumentCollection = collection.parse()?;
    let Json(body) = body?;
    let payload = body.payload.unwrap_or_else(|| serde_json::json!({}));

    let document = state
        .numbering
        .create_document(
            body.branch_id.as_deref().unwrap_or_default(),
            collection,
            body.manual_id.as_deref(),
            &payload,
        )
        .await?;

    info!(
        collection = %collection,
        id = %document.id,
        number = %document.document_number,
        "Document created"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// `DELETE /documents/{collection}/{id}?branchId=`
///
/// Soft delete: the row stays, its number becomes free again.
pub async fn delete_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    query: Result<Query<BranchQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let collection: DocumentCollection = collection.parse()?;
    let Query(query) = query?;
    let branch_id = validate_branch_id(query.branch_id.as_deref().unwrap_or_default())?;

    state.db.documents(collection).soft_delete(&branch_id, &id).await?;
    info!(collection = %collection, id = %id, "Document deleted");

    Ok(StatusCode::NO_CONTENT)
}
