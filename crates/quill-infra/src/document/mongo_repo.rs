//! MongoDB post repository.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, FindOneOptions, FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tokio::sync::Mutex;

use quill_core::domain::unix_now;
use quill_core::{Post, PostId, PostRepository, RepoError};

use super::documents::{PostDocument, attach_author_names, author_names, next_post_id};

/// MongoDB connection configuration.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection URI (e.g., mongodb://localhost:27017)
    pub url: String,
    /// Database holding the `authors` and `posts` collections
    pub database: String,
    /// Connection and server selection timeout
    pub connect_timeout: Duration,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "posts".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl MongoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("MONGODB_URL").unwrap_or(defaults.url),
            database: std::env::var("MONGODB_DATABASE").unwrap_or(defaults.database),
            connect_timeout: std::env::var("MONGODB_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        }
    }
}

/// MongoDB-backed post repository.
///
/// Post ids are emulated: the largest stored `id` plus one. Reading the
/// maximum and inserting are two separate engine calls, so every `add_post`
/// runs under `next_id_lock`, which also holds the highest id handed out by
/// this instance.
pub struct MongoPostRepository {
    db: Database,
    next_id_lock: Mutex<PostId>,
}

impl MongoPostRepository {
    /// Connect, verify the server answers, and ensure the `posts.id` index.
    pub async fn connect(config: &MongoConfig) -> Result<Self, RepoError> {
        let mut options = ClientOptions::parse(config.url.as_str())
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client =
            Client::with_options(options).map_err(|e| RepoError::Connection(e.to_string()))?;
        let db = client.database(&config.database);

        // The driver connects lazily; ping so an unreachable server fails here.
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let repo = Self {
            db,
            next_id_lock: Mutex::new(0),
        };
        repo.ensure_indexes().await?;

        tracing::info!(database = %config.database, "Connected to MongoDB");
        Ok(repo)
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, RepoError> {
        Self::connect(&MongoConfig::from_env()).await
    }

    fn posts(&self) -> Collection<PostDocument> {
        self.db.collection("posts")
    }

    fn authors(&self) -> Collection<Document> {
        self.db.collection("authors")
    }

    async fn ensure_indexes(&self) -> Result<(), RepoError> {
        // Unique so two writers in different processes cannot share an id.
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.posts()
            .create_index(index, None)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        Ok(())
    }

    /// Pick the id for a new post. Caller must hold `next_id_lock`.
    async fn allocate_id(&self, high_water: PostId) -> Result<PostId, RepoError> {
        let options = FindOneOptions::builder().sort(doc! { "id": -1 }).build();
        let last = self
            .posts()
            .find_one(doc! {}, options)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(next_post_id(last.as_ref(), high_water))
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        // Phase 1: every author, keyed by id.
        let authors: Vec<Document> = self
            .authors()
            .find(doc! {}, None)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        let names = author_names(authors);

        // Phase 2: every post, ascending by id, with names attached.
        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();
        let posts: Vec<PostDocument> = self
            .posts()
            .find(doc! {}, options)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(attach_author_names(posts, &names))
    }

    async fn add_post(&self, post: Post) -> Result<PostId, RepoError> {
        let mut high_water = self.next_id_lock.lock().await;

        let id = self.allocate_id(*high_water).await?;
        let now = unix_now();
        let document = PostDocument {
            id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            created_at: now,
            published_at: now,
        };

        self.posts()
            .insert_one(&document, None)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        *high_water = id;
        tracing::debug!(post_id = id, "Post added");
        Ok(id)
    }

    async fn update_post(&self, post: Post) -> Result<(), RepoError> {
        let result = self
            .posts()
            .update_one(
                doc! { "id": post.id },
                doc! {
                    "$set": {
                        "author_id": post.author_id,
                        "title": post.title,
                        "content": post.content,
                        "created_at": post.created_at,
                        "published_at": post.published_at,
                    }
                },
                None,
            )
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.matched_count == 0 {
            tracing::debug!(post_id = post.id, "Update matched no post");
        }
        Ok(())
    }

    async fn delete_post(&self, post: &Post) -> Result<(), RepoError> {
        let result = self
            .posts()
            .delete_one(doc! { "id": post.id }, None)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.deleted_count == 0 {
            tracing::debug!(post_id = post.id, "Delete matched no post");
        }
        Ok(())
    }
}
