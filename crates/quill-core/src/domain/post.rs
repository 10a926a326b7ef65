use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::AuthorId;

/// Post identifier, assigned by the backend on creation.
pub type PostId = i64;

/// Post entity - a publication attributed to an author.
///
/// `author_name` is resolved at read time from the author with id
/// `author_id` and is never stored with the post. Timestamps are Unix
/// seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: AuthorId,
    pub author_name: String,
    pub created_at: i64,
    pub published_at: i64,
}

impl Post {
    /// Build a post to hand to `add_post`.
    ///
    /// Id and timestamps are left zeroed; the backend assigns them.
    pub fn draft(author_id: AuthorId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author_id,
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Current time as Unix seconds, used to stamp new posts.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_leaves_backend_fields_zeroed() {
        let post = Post::draft(7, "Hello", "World");
        assert_eq!(post.id, 0);
        assert_eq!(post.author_id, 7);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert!(post.author_name.is_empty());
        assert_eq!(post.created_at, 0);
        assert_eq!(post.published_at, 0);
    }

    #[test]
    fn test_serializes_with_snake_case_fields() {
        let post = Post::draft(1, "t", "c");
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["author_id"], 1);
        assert_eq!(json["author_name"], "");
        assert!(json.get("published_at").is_some());
    }
}
