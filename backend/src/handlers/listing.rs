//! Listing catalog HTTP handlers
//!
//! Thin wrappers over [`ListingService`]: decode the request, call the
//! service, serialize its result. All interesting behavior lives in the
//! service layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::listing::filter::ListingListOptions;
use crate::services::listing::model::{ListingWriteInput, OwnerFetchError};
use crate::services::ListingService;
use crate::AppState;

fn listing_service(state: &AppState) -> ListingService {
    ListingService::new(state.db.clone(), state.config.platform.clone())
}

/// Public catalog list with filters and pagination
pub async fn list_listings(
    State(state): State<AppState>,
    Query(options): Query<ListingListOptions>,
) -> impl IntoResponse {
    let page = listing_service(&state).fetch_listings(&options).await;
    (StatusCode::OK, Json(page))
}

/// Public listing detail, visibility-filtered
pub async fn get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> impl IntoResponse {
    let detail = listing_service(&state).fetch_listing_by_id(listing_id).await;

    let status = if detail.error.is_some() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else if detail.data.is_none() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, Json(detail))
}

/// All listings of the current user, including archived ones
pub async fn list_my_listings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let page = listing_service(&state).fetch_user_listings(user.user_id).await;
    (StatusCode::OK, Json(page))
}

/// Owner-scoped listing detail, no visibility filter
pub async fn get_my_listing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<Uuid>,
) -> impl IntoResponse {
    let detail = listing_service(&state)
        .fetch_listing_by_id_for_owner(listing_id, user.user_id)
        .await;

    let status = match detail.error {
        Some(OwnerFetchError::NotFound) => StatusCode::NOT_FOUND,
        Some(OwnerFetchError::QueryError) => StatusCode::INTERNAL_SERVER_ERROR,
        None => StatusCode::OK,
    };
    (status, Json(detail))
}

/// Create a listing for the current user
pub async fn create_listing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ListingWriteInput>,
) -> impl IntoResponse {
    match listing_service(&state)
        .create_user_listing(user.user_id, input)
        .await
    {
        Ok(listing_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "success": true, "listing_id": listing_id })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a listing owned by the current user
pub async fn update_listing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<Uuid>,
    Json(input): Json<ListingWriteInput>,
) -> impl IntoResponse {
    match listing_service(&state)
        .update_user_listing(listing_id, user.user_id, input)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Archive a listing owned by the current user
pub async fn delete_listing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<Uuid>,
) -> impl IntoResponse {
    match listing_service(&state)
        .delete_user_listing(listing_id, user.user_id)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
