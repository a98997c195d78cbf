use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Stored documents are open-ended and handled as raw pass-throughs; typed
// payloads exist only where a guard or invariant needs a specific field.

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Author {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// PATCH /update-blog/:id body: the full replacement document, of which only
/// `author.email` is inspected for the ownership check.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBlogPayload {
    pub author: Author,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// DELETE /delete-blog/:email body carries the post id.
#[derive(Debug, Deserialize)]
pub struct DeleteBlogPayload {
    pub id: String,
}

/// POST /add-wishlist body; extra fields are inserted as-is. At most one
/// entry may exist per (postId, userEmail) pair, enforced by an existence
/// check before insert rather than a unique index.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddWishlistPayload {
    #[serde(rename = "postId")]
    pub post_id: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// DELETE /remove-wishlist body carries the post id only; the delete is not
/// scoped to the owner.
#[derive(Debug, Deserialize)]
pub struct RemoveWishlistPayload {
    #[serde(rename = "postId")]
    pub post_id: String,
}

/// POST /jwt body for the self-issued token variant.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}
