//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use quill_core::domain::unix_now;
use quill_core::{Post, PostId, PostRepository, RepoError};

use super::connections::{DatabaseConfig, connect};
use super::entity::author;
use super::entity::post::{self, Entity as PostEntity, PostWithAuthor};

/// PostgreSQL post repository.
///
/// Ids come from the `posts.id` sequence and author names from a LEFT JOIN,
/// so no application-level locking is needed.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Connect to the configured database and build the repository.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepoError> {
        Ok(Self::new(connect(config).await?))
    }

    /// Give back the underlying connection.
    pub fn into_connection(self) -> DbConn {
        self.db
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .column(post::Column::Title)
            .column(post::Column::Content)
            .column(post::Column::AuthorId)
            .column_as(author::Column::Name, "author_name")
            .column(post::Column::CreatedAt)
            .column(post::Column::PublishedAt)
            .join(JoinType::LeftJoin, post::Relation::Author.def())
            .order_by_asc(post::Column::Id)
            .into_model::<PostWithAuthor>()
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_post(&self, post: Post) -> Result<PostId, RepoError> {
        let now = unix_now();
        let model = post::ActiveModel {
            id: NotSet,
            author_id: Set(post.author_id),
            title: Set(post.title),
            content: Set(post.content),
            created_at: Set(now),
            published_at: Set(now),
        };

        let result = PostEntity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        tracing::debug!(post_id = result.last_insert_id, "Post added");
        Ok(result.last_insert_id)
    }

    async fn update_post(&self, post: Post) -> Result<(), RepoError> {
        let changes = post::ActiveModel {
            id: NotSet,
            author_id: Set(post.author_id),
            title: Set(post.title),
            content: Set(post.content),
            created_at: Set(post.created_at),
            published_at: Set(post.published_at),
        };

        let result = PostEntity::update_many()
            .set(changes)
            .filter(post::Column::Id.eq(post.id))
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            tracing::debug!(post_id = post.id, "Update matched no post");
        }
        Ok(())
    }

    async fn delete_post(&self, post: &Post) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(post.id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            tracing::debug!(post_id = post.id, "Delete matched no post");
        }
        Ok(())
    }
}
