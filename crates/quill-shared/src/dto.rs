//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to create a post. Id and timestamps are assigned by storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub author_id: i64,
    pub title: String,
    pub content: String,
}

/// Request to replace a post's mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub published_at: i64,
}

/// A post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub created_at: i64,
    pub published_at: i64,
}

/// Response to a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPostResponse {
    pub id: i64,
}
