//! Category catalog HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::CategoryService;
use crate::AppState;

/// List all marketplace categories in catalog order
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    let service = CategoryService::new(state.db.clone());

    match service.list_categories().await {
        Ok(categories) => (
            StatusCode::OK,
            Json(serde_json::json!({ "categories": categories })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
