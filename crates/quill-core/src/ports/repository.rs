use async_trait::async_trait;

use crate::domain::{Post, PostId};
use crate::error::RepoError;

/// Storage contract for posts.
///
/// Every backend (in-memory, relational, document) implements this trait and
/// must be interchangeable behind `Arc<dyn PostRepository>`. Implementations
/// are called concurrently and must keep id allocation race-free.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Every post, ascending by id, with `author_name` resolved against the
    /// current author data ("" when the author does not exist).
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError>;

    /// Persist a new post and return its id.
    ///
    /// The caller's `id`, `created_at` and `published_at` are ignored: the id
    /// is greater than any id previously assigned by this backend and both
    /// timestamps are set to now.
    async fn add_post(&self, post: Post) -> Result<PostId, RepoError>;

    /// Replace author, title, content and timestamps of the post with
    /// `post.id`. A missing post is a silent no-op.
    async fn update_post(&self, post: Post) -> Result<(), RepoError>;

    /// Remove the post with `post.id`. Deleting a missing post succeeds.
    async fn delete_post(&self, post: &Post) -> Result<(), RepoError>;
}
