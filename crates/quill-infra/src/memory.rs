//! In-memory post repository - the reference backend, used for tests and
//! when no database is configured.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::unix_now;
use quill_core::{Author, AuthorId, Post, PostId, PostRepository, RepoError};

/// Resolves an author id to the author's current name.
///
/// Lets the in-memory backend attach author names without owning author
/// data itself.
pub type AuthorNameResolver = Arc<dyn Fn(AuthorId) -> Option<String> + Send + Sync>;

struct PostStore {
    posts: BTreeMap<PostId, Post>,
    next_id: PostId,
}

/// In-memory post repository using an ordered map behind an async RwLock.
///
/// The map and the id counter share one lock, so allocating an id and
/// inserting the post happen as a single critical section.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<PostStore>,
    resolver: Option<AuthorNameResolver>,
}

impl InMemoryPostRepository {
    /// Empty repository with no author data; every `author_name` is "".
    pub fn new() -> Self {
        Self {
            store: RwLock::new(PostStore {
                posts: BTreeMap::new(),
                next_id: 1,
            }),
            resolver: None,
        }
    }

    /// Repository resolving author names from a fixed set of authors.
    pub fn with_authors(authors: impl IntoIterator<Item = Author>) -> Self {
        let names: HashMap<AuthorId, String> =
            authors.into_iter().map(|a| (a.id, a.name)).collect();
        Self::with_resolver(Arc::new(move |id| names.get(&id).cloned()))
    }

    /// Repository resolving author names through an external lookup.
    pub fn with_resolver(resolver: AuthorNameResolver) -> Self {
        Self {
            resolver: Some(resolver),
            ..Self::new()
        }
    }

    fn author_name(&self, author_id: AuthorId) -> String {
        self.resolver
            .as_ref()
            .and_then(|resolve| resolve(author_id))
            .unwrap_or_default()
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        let snapshot: Vec<Post> = {
            let store = self.store.read().await;
            store.posts.values().cloned().collect()
        };

        Ok(snapshot
            .into_iter()
            .map(|mut post| {
                post.author_name = self.author_name(post.author_id);
                post
            })
            .collect())
    }

    async fn add_post(&self, post: Post) -> Result<PostId, RepoError> {
        let now = unix_now();
        let mut store = self.store.write().await;

        let id = store.next_id;
        store.next_id += 1;
        store.posts.insert(
            id,
            Post {
                id,
                title: post.title,
                content: post.content,
                author_id: post.author_id,
                author_name: String::new(),
                created_at: now,
                published_at: now,
            },
        );

        tracing::debug!(post_id = id, "Post added");
        Ok(id)
    }

    async fn update_post(&self, post: Post) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        match store.posts.get_mut(&post.id) {
            Some(existing) => {
                existing.author_id = post.author_id;
                existing.title = post.title;
                existing.content = post.content;
                existing.created_at = post.created_at;
                existing.published_at = post.published_at;
                tracing::debug!(post_id = post.id, "Post updated");
            }
            None => tracing::debug!(post_id = post.id, "Update matched no post"),
        }
        Ok(())
    }

    async fn delete_post(&self, post: &Post) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        if store.posts.remove(&post.id).is_none() {
            tracing::debug!(post_id = post.id, "Delete matched no post");
        }
        Ok(())
    }
}
