//! Data Transfer Objects - request/response bodies for the six post operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a Create call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Body of an Update call. The post id travels in the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Wire representation of a post. Timestamps are RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response of Create, Get and Update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: PostDto,
}

/// Response of Delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePostResponse {
    pub id: String,
    pub success: bool,
}

/// Response of List and ListByAuthor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostDto>,
}
