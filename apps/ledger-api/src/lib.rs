//! # Ledger API
//!
//! HTTP surface of the document numbering subsystem.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ledger API Server                                │
//! │                                                                         │
//! │  Admin UI  ──► POST /number-setting ──┐                                │
//! │            ──► GET  /number/next    ──┤                                │
//! │                                        ├──► NumberingService ──► SQLite │
//! │  Documents ──► POST /documents/{c}  ──┘                                │
//! │            ──► DELETE /documents/{c}/{id}                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

use axum::routing::{delete, get, post};
use axum::Router;
use ledger_db::{Database, NumberingService};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub numbering: NumberingService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let numbering = db.numbering();
        AppState { db, numbering }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/number-setting",
            post(routes::settings::upsert_setting).get(routes::settings::list_settings),
        )
        .route("/number/next", get(routes::settings::preview_next))
        .route("/documents/{collection}", post(routes::documents::create_document))
        .route(
            "/documents/{collection}/{id}",
            delete(routes::documents::delete_document),
        )
        .route("/health", get(routes::health::health))
        .with_state(state)
}
