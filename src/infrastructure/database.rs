use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::blog_post::{Author, BlogPost, BlogPostUpdate, NewBlogPost};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Collection accessor for blog post documents.
///
/// Implementations own id and timestamp assignment: callers hand over a
/// [`NewBlogPost`] and get back the stored [`BlogPost`].
#[async_trait]
pub trait BlogPostStore: Send + Sync {
    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost, StoreError>;

    async fn insert_many(&self, posts: Vec<NewBlogPost>) -> Result<Vec<BlogPost>, StoreError> {
        let mut inserted = Vec::with_capacity(posts.len());
        for post in posts {
            inserted.push(self.insert(post).await?);
        }
        Ok(inserted)
    }

    /// Every post in the collection, oldest first.
    async fn find(&self) -> Result<Vec<BlogPost>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, StoreError>;
    async fn find_one(&self) -> Result<Option<BlogPost>, StoreError>;

    /// Returns the updated post, or `None` if no post has this id.
    async fn update_by_id(&self, id: Uuid, update: BlogPostUpdate) -> Result<Option<BlogPost>, StoreError>;

    /// Returns the number of removed posts (0 or 1).
    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;

    /// Remove every post. Used for test teardown.
    async fn drop_all(&self) -> Result<(), StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn BlogPostStore>;

const TABLE: &str = "blog_posts";
const COLUMNS: &str = "id, title, content, author, created";

#[derive(Debug, FromRow)]
struct BlogPostRow {
    id: Uuid,
    title: String,
    content: String,
    author: Json<Author>,
    created: DateTime<Utc>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author: row.author.0,
            created: row.created,
        }
    }
}

/// PostgreSQL-backed store. The author is kept as a JSONB document so a row
/// maps one-to-one onto a blog post document.
#[derive(Clone)]
pub struct PgBlogPostStore {
    pool: PgPool,
}

impl PgBlogPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        debug!(max_connections, "Connecting to PostgreSQL");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to connect to PostgreSQL");
                e
            })?;
        info!(max_connections, "PostgreSQL connection pool ready");
        Ok(Self::new(pool))
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        debug!(table = TABLE, "Ensuring collection table exists");
        let query = format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                author JSONB NOT NULL,
                created TIMESTAMPTZ NOT NULL DEFAULT now()
            )"
        );
        sqlx::query(&query).execute(&self.pool).await.map_err(|e| {
            error!(table = TABLE, error = %e, "Failed to create collection table");
            e
        })?;
        Ok(())
    }
}

#[async_trait]
impl BlogPostStore for PgBlogPostStore {
    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost, StoreError> {
        let post = BlogPost::new(post);
        debug!(table = TABLE, post_id = %post.id, "Starting insert operation");

        let query = format!("INSERT INTO {TABLE} ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, BlogPostRow>(&query)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(Json(&post.author))
            .bind(post.created)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(table = TABLE, post_id = %post.id, error = %e, "Insert operation failed");
                e
            })?;

        Ok(row.into())
    }

    async fn insert_many(&self, posts: Vec<NewBlogPost>) -> Result<Vec<BlogPost>, StoreError> {
        debug!(table = TABLE, count = posts.len(), "Starting bulk insert");
        let query = format!("INSERT INTO {TABLE} ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}");

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(posts.len());
        for post in posts.into_iter().map(BlogPost::new) {
            let row = sqlx::query_as::<_, BlogPostRow>(&query)
                .bind(post.id)
                .bind(&post.title)
                .bind(&post.content)
                .bind(Json(&post.author))
                .bind(post.created)
                .fetch_one(&mut *tx)
                .await?;
            inserted.push(row.into());
        }
        tx.commit().await?;

        info!(table = TABLE, count = inserted.len(), "Bulk insert committed");
        Ok(inserted)
    }

    async fn find(&self) -> Result<Vec<BlogPost>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM {TABLE} ORDER BY created, id");
        let rows = sqlx::query_as::<_, BlogPostRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(table = TABLE, error = %e, "Find operation failed");
                e
            })?;
        debug!(table = TABLE, count = rows.len(), "Find operation successful");
        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1");
        let row = sqlx::query_as::<_, BlogPostRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(table = TABLE, post_id = %id, error = %e, "Read operation failed");
                e
            })?;

        match &row {
            Some(_) => debug!(table = TABLE, post_id = %id, "Read operation successful - record found"),
            None => debug!(table = TABLE, post_id = %id, "Read operation successful - no record found"),
        }
        Ok(row.map(BlogPost::from))
    }

    async fn find_one(&self) -> Result<Option<BlogPost>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM {TABLE} ORDER BY created, id LIMIT 1");
        let row = sqlx::query_as::<_, BlogPostRow>(&query)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BlogPost::from))
    }

    async fn update_by_id(&self, id: Uuid, update: BlogPostUpdate) -> Result<Option<BlogPost>, StoreError> {
        debug!(table = TABLE, post_id = %id, "Starting update operation");

        // `author || $4` merges only the name keys present in the update.
        let author_patch = serde_json::to_value(update.author.unwrap_or_default())?;
        let query = format!(
            "UPDATE {TABLE} SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                author = author || $4
            WHERE id = $1
            RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BlogPostRow>(&query)
            .bind(id)
            .bind(update.title)
            .bind(update.content)
            .bind(Json(author_patch))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(table = TABLE, post_id = %id, error = %e, "Update operation failed");
                e
            })?;

        if row.is_some() {
            info!(table = TABLE, post_id = %id, "Update operation successful");
        }
        Ok(row.map(BlogPost::from))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        debug!(table = TABLE, post_id = %id, "Starting delete operation");
        let query = format!("DELETE FROM {TABLE} WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(table = TABLE, post_id = %id, error = %e, "Delete operation failed");
                e
            })?;

        let rows_affected = result.rows_affected();
        if rows_affected > 0 {
            info!(table = TABLE, rows_affected, "Delete operation successful");
        } else {
            debug!(table = TABLE, "Delete operation completed - no rows affected");
        }
        Ok(rows_affected)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let query = format!("SELECT COUNT(*) FROM {TABLE}");
        let count = sqlx::query_scalar::<_, i64>(&query).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn drop_all(&self) -> Result<(), StoreError> {
        warn!(table = TABLE, "Deleting every blog post");
        let query = format!("TRUNCATE {TABLE}");
        sqlx::query(&query).execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
