use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::{to_document, Document};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

/// POST /add-comment - insert the body as a new comment. No auth: the
/// original surface accepts comments from any caller.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let document = to_document(&payload)
        .map_err(|_| ApiError::bad_request("Request body must be a JSON object"))?;
    let ack = state.store.insert_comment(document).await?;

    Ok(Json(json!(ack)))
}

/// GET /comments/:blogId - comments for one post
pub async fn list_for_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let comments = state.store.comments_for_blog(&blog_id).await?;
    Ok(Json(comments))
}
