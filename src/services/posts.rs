use std::sync::Arc;

use chrono::Utc;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Post, PostView};

pub const MAX_CONTENT_LENGTH: usize = 240;

#[derive(Clone)]
pub struct PostsService {
    db: Arc<Database>,
}

impl PostsService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Newest-first page of the feed with author usernames resolved.
    /// `page` is 1-based.
    pub async fn get_posts(&self, page: u32, page_size: u32) -> AppResult<Vec<PostView>> {
        let offset = (page as i64 - 1) * page_size as i64;

        let posts = sqlx::query_as::<_, PostView>(
            "SELECT p.id, p.content, p.created_at, p.cached_like_count AS like_count,
                    u.username AS author
             FROM posts p
             JOIN users u ON u.id = p.author_id
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.db.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list posts: {}", e)))?;

        Ok(posts)
    }

    pub async fn get_post(&self, id: i64) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>(
            "SELECT id, author_id, content, created_at, cached_like_count
             FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get post {}: {}", id, e)))
    }

    pub async fn get_post_view(&self, id: i64) -> AppResult<Option<PostView>> {
        sqlx::query_as::<_, PostView>(
            "SELECT p.id, p.content, p.created_at, p.cached_like_count AS like_count,
                    u.username AS author
             FROM posts p
             JOIN users u ON u.id = p.author_id
             WHERE p.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get post {}: {}", id, e)))
    }

    /// Create a post with an empty like count. The cached counter is owned by
    /// the likes service from here on; post edits never touch it.
    pub async fn create_post(&self, author_id: i64, content: String) -> AppResult<Post> {
        let length = content.chars().count();
        if length == 0 || length > MAX_CONTENT_LENGTH {
            return Err(AppError::Validation(format!(
                "Post content must be between 1 and {} characters",
                MAX_CONTENT_LENGTH
            )));
        }

        let now = Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO posts (author_id, content, created_at, cached_like_count)
             VALUES (?, ?, ?, 0)",
        )
        .bind(author_id)
        .bind(&content)
        .bind(now)
        .execute(&self.db.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create post: {}", e)))?;

        Ok(Post {
            id: result.last_insert_rowid(),
            author_id,
            content,
            created_at: now,
            cached_like_count: 0,
        })
    }

    /// Delete a post. Its ledger rows go with it via the foreign-key cascade.
    pub async fn delete_post(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.db.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete post {}: {}", id, e)))?;

        Ok(result.rows_affected() > 0)
    }
}
