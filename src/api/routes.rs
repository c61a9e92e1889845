//! API Routes
//!
//! Configures the Axum router with all cache operations endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, delete_prefix_handler, get_handler, health_handler,
    invalidate_category_handler, invalidate_policy_handler, invalidate_search_handler,
    set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/*key", get(get_handler))
        .route("/del/*key", delete(delete_handler))
        .route("/prefix/*pattern", delete(delete_prefix_handler))
        .route("/clear", post(clear_handler))
        .route(
            "/invalidate/category/:category_id",
            post(invalidate_category_handler),
        )
        .route("/invalidate/search", post(invalidate_search_handler))
        .route(
            "/invalidate/policy/:policy_type/:marketplace_id",
            post(invalidate_policy_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
