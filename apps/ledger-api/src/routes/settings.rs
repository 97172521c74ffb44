//! Numbering administration: upsert, list, preview.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use ledger_core::{NumberPreview, NumberSetting};

use super::{parse_doc_type, BranchQuery};
use crate::error::ApiResult;
use crate::AppState;

/// Body of `POST /number-setting`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSettingRequest {
    pub branch_id: Option<String>,
    pub doc_type: Option<String>,
    pub mode: Option<String>,
    pub prefix: Option<String>,
    pub next_number: Option<NextNumberInput>,
}

/// Admin forms send the counter either as text (`"00007"`, keeps padding)
/// or as a bare JSON number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NextNumberInput {
    Text(String),
    Number(i64),
}

impl NextNumberInput {
    fn into_text(self) -> String {
        match self {
            NextNumberInput::Text(text) => text,
            NextNumberInput::Number(n) => n.to_string(),
        }
    }
}

/// `POST /number-setting`
pub async fn upsert_setting(
    State(state): State<AppState>,
    body: Result<Json<UpsertSettingRequest>, JsonRejection>,
) -> ApiResult<Json<NumberSetting>> {
    let Json(body) = body?;
    let doc_type = parse_doc_type(body.doc_type.as_deref())?;
    let next_number = body.next_number.map(NextNumberInput::into_text);

    let setting = state
        .numbering
        .upsert_setting(
            body.branch_id.as_deref().unwrap_or_default(),
            doc_type,
            body.mode.as_deref(),
            body.prefix.as_deref(),
            next_number.as_deref(),
        )
        .await?;

    Ok(Json(setting))
}

/// `GET /number-setting?branchId=`
pub async fn list_settings(
    State(state): State<AppState>,
    query: Result<Query<BranchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<NumberSetting>>> {
    let Query(query) = query?;
    let settings = state
        .numbering
        .list_settings(query.branch_id.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(settings))
}

/// Query of `GET /number/next`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub branch_id: Option<String>,
    pub doc_type: Option<String>,
}

/// `GET /number/next?branchId=&docType=`
pub async fn preview_next(
    State(state): State<AppState>,
    query: Result<Query<PreviewQuery>, QueryRejection>,
) -> ApiResult<Json<NumberPreview>> {
    let Query(query) = query?;
    let doc_type = parse_doc_type(query.doc_type.as_deref())?;

    let preview = state
        .numbering
        .preview(query.branch_id.as_deref().unwrap_or_default(), doc_type)
        .await?;
    debug!(doc_type = %doc_type, generated_id = %preview.generated_id, "Preview served");

    Ok(Json(preview))
}
