use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::bson::{to_document, Document};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ensure_owner, AuthUser, Deny};
use crate::models::{AddWishlistPayload, RemoveWishlistPayload};
use crate::AppState;

/// POST /add-wishlist - check-then-insert. Rejects a duplicate
/// (postId, userEmail) pair with 400. The two steps are not atomic;
/// concurrent duplicates can slip through (no unique index backs this).
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<AddWishlistPayload>,
) -> Result<Json<Value>, ApiError> {
    let exists = state
        .store
        .wishlist_exists(&payload.post_id, &payload.user_email)
        .await?;
    if exists {
        return Err(ApiError::bad_request("Already exists in the wishlist"));
    }

    let document = to_document(&payload)
        .map_err(|_| ApiError::bad_request("Request body must be a JSON object"))?;
    let ack = state.store.insert_wishlist(document).await?;

    Ok(Json(json!(ack)))
}

/// DELETE /remove-wishlist - delete by postId from the body. Not scoped to
/// the owning user, matching the original surface.
pub async fn remove(
    State(state): State<AppState>,
    Json(payload): Json<RemoveWishlistPayload>,
) -> Result<Json<Value>, ApiError> {
    let ack = state.store.remove_wishlist(&payload.post_id).await?;
    Ok(Json(json!(ack)))
}

/// GET /wishlists/:email - entries owned by the verified identity. This
/// endpoint denies a mismatch with 401 where the blog endpoints use 403.
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Document>>, ApiError> {
    ensure_owner(&auth, &email, Deny::Unauthorized)?;

    let entries = state.store.wishlist_for_user(&email).await?;
    Ok(Json(entries))
}

/// GET /wishlist/:postId - boolean existence for (verified email, postId)
pub async fn check(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<bool>, ApiError> {
    let exists = state.store.wishlist_exists(&post_id, &auth.email).await?;
    Ok(Json(exists))
}
