use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{Post, PostChanges};
use crate::error::StoreError;

/// Stream of posts produced by `find_many`.
///
/// Dropping the stream closes the underlying store cursor.
pub type PostCursor = BoxStream<'static, Result<Post, StoreError>>;

/// Selection for `find_many`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Author(String),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Author(author_id) => post.author_id == *author_id,
        }
    }
}

/// Counts reported by `update_one`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Post store trait - the capabilities the service needs from a document
/// store collection holding posts, keyed by post id.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a full post record. Returns the id the store recorded.
    async fn insert_one(&self, post: &Post) -> Result<String, StoreError>;

    /// Find a single post by id.
    async fn find_one(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Open a cursor over every post matching the filter.
    async fn find_many(&self, filter: PostFilter) -> Result<PostCursor, StoreError>;

    /// Overwrite the mutable fields of the post with the given id.
    /// Matching nothing is not an error.
    async fn update_one(&self, id: &str, changes: PostChanges)
    -> Result<UpdateOutcome, StoreError>;

    /// Remove the post with the given id. Returns the number of removed records.
    async fn delete_one(&self, id: &str) -> Result<u64, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
