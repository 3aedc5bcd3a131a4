//! Route definitions for the EkoTregu marketplace backend

use axum::{
    middleware,
    routing::get,
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Public catalog routes
        .route("/listings", get(handlers::list_listings))
        .route("/listings/:listing_id", get(handlers::get_listing))
        .route("/categories", get(handlers::list_categories))
        // Protected routes - the current user's listings
        .nest("/my/listings", my_listing_routes(state))
}

/// Owner-scoped listing routes (protected)
fn my_listing_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_my_listings).post(handlers::create_listing),
        )
        .route(
            "/:listing_id",
            get(handlers::get_my_listing)
                .put(handlers::update_listing)
                .delete(handlers::delete_listing),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
