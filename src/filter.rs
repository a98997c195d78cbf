use mongodb::bson::{doc, Document};
use serde::Deserialize;

/// Query string accepted by GET /blogs.
#[derive(Debug, Default, Deserialize)]
pub struct BlogListQuery {
    pub featured: Option<String>,
    #[serde(rename = "breakingNews")]
    pub breaking_news: Option<String>,
    #[serde(rename = "categoryType")]
    pub category_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

/// One selected filter per request. Exactly one branch applies, chosen in
/// fixed priority order: featured > breakingNews > category > search > none.
#[derive(Debug, Clone, PartialEq)]
pub enum BlogFilter {
    Featured,
    Breaking,
    Category(String),
    Search(String),
    All,
}

impl BlogFilter {
    /// Select the active filter branch. Flags count as present when the
    /// parameter is non-empty (the frontend always sends `true`). The
    /// `"All"` category sentinel is equivalent to no category and falls
    /// through to the lower-priority branches.
    pub fn from_query(query: &BlogListQuery) -> Self {
        if flag_set(&query.featured) {
            return BlogFilter::Featured;
        }
        if flag_set(&query.breaking_news) {
            return BlogFilter::Breaking;
        }
        if let Some(category) = query.category_type.as_deref() {
            if !category.is_empty() && category != "All" {
                return BlogFilter::Category(category.to_string());
            }
        }
        if let Some(search) = query.search.as_deref() {
            if !search.is_empty() {
                return BlogFilter::Search(search.to_string());
            }
        }
        BlogFilter::All
    }

    /// Render the filter as the store's predicate document.
    pub fn to_document(&self) -> Document {
        match self {
            BlogFilter::Featured => doc! { "featured": true },
            BlogFilter::Breaking => doc! { "breakingNews": true },
            BlogFilter::Category(category) => doc! { "category": category },
            // Case-insensitive substring match on the title.
            BlogFilter::Search(search) => doc! { "title": { "$regex": search, "$options": "i" } },
            BlogFilter::All => Document::new(),
        }
    }
}

fn flag_set(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some(s) if !s.is_empty())
}

/// Pagination window: `skip = page * limit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    pub page: u64,
    pub limit: Option<i64>,
}

impl Page {
    pub fn from_query(query: &BlogListQuery) -> Self {
        Self {
            page: query.page.unwrap_or(0),
            limit: query.limit,
        }
    }

    /// Both factors come straight from the query string, so the product is
    /// saturated rather than trusted to stay in range.
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.limit.unwrap_or(0).max(0) as u64)
    }
}
