use crate::error::Result;
use crate::models::{Post, PostType};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

/// Persistence contract for posts.
///
/// Lookups never mutate state. `update_content` and `delete` report whether
/// a row was affected so callers can map a missing id explicitly.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        post_type: PostType,
    ) -> Result<Post>;

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>>;

    async fn find_all(&self) -> Result<Vec<Post>>;

    async fn find_by_type(&self, post_type: PostType) -> Result<Vec<Post>>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Post>>;

    async fn update_content(&self, post_id: Uuid, title: &str, content: &str) -> Result<bool>;

    async fn delete(&self, post_id: Uuid) -> Result<bool>;
}

/// Postgres-backed post repository.
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        post_type: PostType,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, content, post_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, post_type, user_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(post_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, post_type, user_id, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_all(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, post_type, user_id, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn find_by_type(&self, post_type: PostType) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, post_type, user_id, created_at, updated_at
            FROM posts
            WHERE post_type = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, post_type, user_id, created_at, updated_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn update_content(&self, post_id: Uuid, title: &str, content: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $1, content = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
