use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use mongodb::bson::{to_document, Document};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::filter::{BlogFilter, BlogListQuery, Page};
use crate::middleware::{ensure_owner, AuthUser, Deny};
use crate::models::{DeleteBlogPayload, UpdateBlogPayload};
use crate::store::Store;
use crate::AppState;

/// GET /blogs - list posts with one filter branch and pagination
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = BlogFilter::from_query(&query);
    let page = Page::from_query(&query);

    let blogs = state.store.list_blogs(&filter, page).await?;
    Ok(Json(blogs))
}

/// GET /total-blogs - approximate count of the posts collection
pub async fn total(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = state.store.count_blogs().await?;
    Ok(Json(json!({ "count": count })))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// GET /recent-posts - newest first by publishedAt
pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let blogs = state.store.recent_blogs(query.limit).await?;
    Ok(Json(blogs))
}

/// GET /featured-banners - featuredBanner=true, capped at 5
pub async fn featured_banners(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let blogs = state.store.featured_banners().await?;
    Ok(Json(blogs))
}

/// GET /featured-blogs - top 10 posts by description length
pub async fn featured_by_length(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let mut blogs = state.store.all_blogs().await?;

    blogs.sort_by_key(|doc| std::cmp::Reverse(description_length(doc)));
    blogs.truncate(10);

    Ok(Json(blogs))
}

fn description_length(doc: &Document) -> usize {
    doc.get_str("description").map(|s| s.chars().count()).unwrap_or(0)
}

/// GET /single-blog/:id - 404 with a structured body when absent. A
/// malformed id surfaces as a 500, matching the original behavior.
pub async fn single(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let id = Store::parse_id(&id)?;

    match state.store.find_blog(id).await? {
        Some(blog) => Ok(Json(blog)),
        None => Err(ApiError::not_found("Blog not found")),
    }
}

/// POST /add-blog/:email - insert the body as a new post. The verified
/// identity must match the path email.
pub async fn create(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    ensure_owner(&auth, &email, Deny::Forbidden)?;

    let document = to_document(&payload)
        .map_err(|_| ApiError::bad_request("Request body must be a JSON object"))?;
    let ack = state.store.insert_blog(document).await?;

    Ok(Json(json!(ack)))
}

/// PATCH /update-blog/:id - full-document merge-update. The verified
/// identity must match the author email carried in the body.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<UpdateBlogPayload>,
) -> Result<Json<Value>, ApiError> {
    ensure_owner(&auth, &payload.author.email, Deny::Forbidden)?;

    let id = Store::parse_id(&id)?;
    let mut document = to_document(&payload)
        .map_err(|_| ApiError::bad_request("Request body must be a JSON object"))?;
    // The store rejects $set on the immutable _id field.
    document.remove("_id");

    let ack = state.store.update_blog(id, document).await?;
    Ok(Json(json!(ack)))
}

/// DELETE /delete-blog/:email - delete the post whose id is in the body.
/// The verified identity must match the path email.
pub async fn remove(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<DeleteBlogPayload>,
) -> Result<Json<Value>, ApiError> {
    ensure_owner(&auth, &email, Deny::Forbidden)?;

    let id = Store::parse_id(&payload.id)?;
    let ack = state.store.delete_blog(id).await?;

    Ok(Json(json!(ack)))
}

/// GET /my-blogs/:email - posts authored by the verified identity
pub async fn my_blogs(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Document>>, ApiError> {
    ensure_owner(&auth, &email, Deny::Forbidden)?;

    let blogs = state.store.blogs_by_author(&email).await?;
    Ok(Json(blogs))
}
