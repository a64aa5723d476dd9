use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a titled piece of content attributed to an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with a freshly minted id and both timestamps set to now.
    pub fn new(title: String, content: String, author_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields. `id` and `created_at` are never touched.
    pub fn apply(&mut self, changes: PostChanges) {
        self.title = changes.title;
        self.content = changes.content;
        self.author_id = changes.author_id;
        self.updated_at = changes.updated_at;
    }
}

/// The set of fields an update is allowed to overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub updated_at: DateTime<Utc>,
}

impl PostChanges {
    pub fn new(title: String, content: String, author_id: String) -> Self {
        Self {
            title,
            content,
            author_id,
            updated_at: Utc::now(),
        }
    }
}

/// Result of a delete call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedPost {
    pub id: String,
    pub success: bool,
}
