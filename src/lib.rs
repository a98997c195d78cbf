use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;

use auth::TokenVerifier;
use config::SecurityConfig;
use store::Store;

/// Process-wide shared state: the long-lived store handle, the token
/// verifier seam, and the security knobs needed for token issuance.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub verifier: Arc<dyn TokenVerifier>,
    pub security: SecurityConfig,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(blog_routes())
        .merge(comment_routes())
        .merge(wishlist_routes())
        .merge(session_routes())
        // Ownership-gated surface behind the bearer gate
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn blog_routes() -> Router<AppState> {
    use handlers::blogs;

    Router::new()
        .route("/blogs", get(blogs::list))
        .route("/total-blogs", get(blogs::total))
        .route("/recent-posts", get(blogs::recent))
        .route("/featured-banners", get(blogs::featured_banners))
        .route("/featured-blogs", get(blogs::featured_by_length))
        .route("/single-blog/:id", get(blogs::single))
}

fn comment_routes() -> Router<AppState> {
    use handlers::comments;

    Router::new()
        .route("/add-comment", post(comments::create))
        .route("/comments/:blogId", get(comments::list_for_blog))
}

fn wishlist_routes() -> Router<AppState> {
    use handlers::wishlist;

    Router::new()
        .route("/add-wishlist", post(wishlist::create))
        .route("/remove-wishlist", delete(wishlist::remove))
}

fn session_routes() -> Router<AppState> {
    use handlers::session;

    Router::new()
        .route("/jwt", post(session::issue_token))
        .route("/logout", get(session::logout))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::{blogs, wishlist};

    Router::new()
        .route("/add-blog/:email", post(blogs::create))
        .route("/update-blog/:id", patch(blogs::update))
        .route("/delete-blog/:email", delete(blogs::remove))
        .route("/my-blogs/:email", get(blogs::my_blogs))
        .route("/wishlists/:email", get(wishlist::list_for_user))
        .route("/wishlist/:postId", get(wishlist::check))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::bearer_auth_middleware,
        ))
}

/// GET / - static liveness string
async fn root() -> &'static str {
    "Blogify server is running"
}

/// GET /health - liveness plus a store round-trip
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
