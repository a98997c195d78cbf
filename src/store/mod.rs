use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::{FindOptions, UpdateOptions};
use mongodb::{Client, Collection, Database};
use serde::Serialize;

use crate::filter::{BlogFilter, Page};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("malformed document id: {0}")]
    MalformedId(String),
}

/// Driver-shaped mutation acknowledgments, returned to clients verbatim.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: Bson,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<Bson>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Process-wide document store handle: one client, three collections.
/// Initialized once at startup and shared for the process lifetime; the
/// driver connects lazily on first use and there is no explicit teardown.
#[derive(Clone, Debug)]
pub struct Store {
    db: Database,
    blogs: Collection<Document>,
    comments: Collection<Document>,
    wishlist: Collection<Document>,
}

impl Store {
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let db = client.database(db_name);

        Ok(Self {
            blogs: db.collection("blogs"),
            comments: db.collection("comments"),
            wishlist: db.collection("wishlist"),
            db,
        })
    }

    /// Round-trip ping, used by the health endpoint.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
        ObjectId::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
    }

    // --- blogs ---

    pub async fn list_blogs(
        &self,
        filter: &BlogFilter,
        page: Page,
    ) -> Result<Vec<Document>, StoreError> {
        let options = FindOptions::builder()
            .skip(page.skip())
            .limit(page.limit)
            .build();
        let cursor = self.blogs.find(filter.to_document(), options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Approximate total, from collection metadata rather than a scan.
    pub async fn count_blogs(&self) -> Result<u64, StoreError> {
        Ok(self.blogs.estimated_document_count(None).await?)
    }

    pub async fn recent_blogs(&self, limit: Option<i64>) -> Result<Vec<Document>, StoreError> {
        let options = FindOptions::builder()
            .sort(doc! { "publishedAt": -1 })
            .limit(limit)
            .build();
        let cursor = self.blogs.find(Document::new(), options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn featured_banners(&self) -> Result<Vec<Document>, StoreError> {
        let options = FindOptions::builder().limit(5).build();
        let cursor = self
            .blogs
            .find(doc! { "featuredBanner": true }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn all_blogs(&self) -> Result<Vec<Document>, StoreError> {
        let cursor = self.blogs.find(Document::new(), None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_blog(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        Ok(self.blogs.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn blogs_by_author(&self, email: &str) -> Result<Vec<Document>, StoreError> {
        let cursor = self.blogs.find(doc! { "author.email": email }, None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn insert_blog(&self, document: Document) -> Result<InsertAck, StoreError> {
        let result = self.blogs.insert_one(document, None).await?;
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: result.inserted_id,
        })
    }

    /// Full-document merge-update by id ($set of every body field). Runs
    /// with upsert on, as the original did: an absent id inserts the set
    /// fields as a new document and the ack carries `upsertedId`.
    pub async fn update_blog(
        &self,
        id: ObjectId,
        document: Document,
    ) -> Result<UpdateAck, StoreError> {
        let options = UpdateOptions::builder().upsert(true).build();
        let result = self
            .blogs
            .update_one(doc! { "_id": id }, doc! { "$set": document }, options)
            .await?;
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id,
        })
    }

    pub async fn delete_blog(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        let result = self.blogs.delete_one(doc! { "_id": id }, None).await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    // --- comments ---

    pub async fn insert_comment(&self, document: Document) -> Result<InsertAck, StoreError> {
        let result = self.comments.insert_one(document, None).await?;
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: result.inserted_id,
        })
    }

    pub async fn comments_for_blog(&self, blog_id: &str) -> Result<Vec<Document>, StoreError> {
        let cursor = self.comments.find(doc! { "blogId": blog_id }, None).await?;
        Ok(cursor.try_collect().await?)
    }

    // --- wishlist ---

    /// Existence check for the duplicate guard. Check-then-insert is not
    /// atomic; concurrent inserts for the same pair can both pass (known
    /// race, no unique index backs the invariant).
    pub async fn wishlist_exists(
        &self,
        post_id: &str,
        user_email: &str,
    ) -> Result<bool, StoreError> {
        let found = self
            .wishlist
            .find_one(doc! { "postId": post_id, "userEmail": user_email }, None)
            .await?;
        Ok(found.is_some())
    }

    pub async fn insert_wishlist(&self, document: Document) -> Result<InsertAck, StoreError> {
        let result = self.wishlist.insert_one(document, None).await?;
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: result.inserted_id,
        })
    }

    /// Deletes by post id alone; not scoped to the owning user.
    pub async fn remove_wishlist(&self, post_id: &str) -> Result<DeleteAck, StoreError> {
        let result = self
            .wishlist
            .delete_one(doc! { "postId": post_id }, None)
            .await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    pub async fn wishlist_for_user(&self, user_email: &str) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .wishlist
            .find(doc! { "userEmail": user_email }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
