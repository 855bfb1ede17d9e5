// Like write path and counter reconciliation
//
// The cached like count on a post is written through: the ledger row and the
// counter delta commit in one transaction, so readers never observe one
// without the other. Reconciliation recomputes every counter from the ledger
// in a single set-based update and corrects any drift.

use std::sync::Arc;

use chrono::Utc;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::PostLike;

#[derive(Clone)]
pub struct LikesService {
    db: Arc<Database>,
}

impl LikesService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record that `user_id` likes `post_id`.
    ///
    /// Returns `Ok(false)` when the user has already liked the post - the
    /// (post_id, user_id) primary key arbitrates concurrent duplicates, so
    /// exactly one of any set of racing calls inserts the row and increments
    /// the counter. The caller is expected to have verified the post exists.
    pub async fn create_like(&self, user_id: i64, post_id: i64) -> AppResult<bool> {
        let now = Utc::now().timestamp();
        let mut tx = self.db.begin_transaction().await?;

        let inserted = sqlx::query(
            "INSERT INTO post_likes (post_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                // Duplicate like - expected outcome, not an error
                tx.rollback().await.map_err(|e| {
                    AppError::DatabaseError(format!("Failed to rollback transaction: {}", e))
                })?;
                return Ok(false);
            }
            Err(e) => {
                return Err(AppError::DatabaseError(format!(
                    "Failed to insert like for post {}: {}",
                    post_id, e
                )))
            }
        }

        // Atomic delta against the stored value, in the same transaction as
        // the ledger insert. Never read-then-write: concurrent likes of the
        // same post must not lose updates to each other.
        sqlx::query("UPDATE posts SET cached_like_count = cached_like_count + 1 WHERE id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to increment like count for post {}: {}",
                    post_id, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))?;

        Ok(true)
    }

    /// Remove `user_id`'s like of `post_id`.
    ///
    /// Returns `Ok(false)` when no matching like existed. The decrement is
    /// clamped at zero so the counter can never go negative, even if drift
    /// has already desynchronized it from the ledger.
    pub async fn delete_like(&self, user_id: i64, post_id: i64) -> AppResult<bool> {
        let mut tx = self.db.begin_transaction().await?;

        let deleted = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to delete like for post {}: {}",
                    post_id, e
                ))
            })?
            .rows_affected();

        if deleted > 0 {
            sqlx::query(
                "UPDATE posts SET cached_like_count = MAX(cached_like_count - 1, 0) WHERE id = ?",
            )
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to decrement like count for post {}: {}",
                    post_id, e
                ))
            })?;
        }

        // A no-op delete still commits: an empty transaction is harmless.
        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))?;

        Ok(deleted > 0)
    }

    /// Ledger rows for a post, newest first.
    pub async fn get_likes(&self, post_id: i64) -> AppResult<Vec<PostLike>> {
        sqlx::query_as::<_, PostLike>(
            "SELECT post_id, user_id, created_at FROM post_likes
             WHERE post_id = ?
             ORDER BY created_at DESC, user_id DESC",
        )
        .bind(post_id)
        .fetch_all(&self.db.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to list likes for post {}: {}", post_id, e))
        })
    }

    /// Recompute every post's cached like count from the ledger.
    ///
    /// One set-based update, all-or-nothing, idempotent. Invoked by the
    /// periodic trigger; failures propagate to it rather than retrying here.
    pub async fn reconcile_all(&self) -> AppResult<()> {
        let mut tx = self.db.begin_transaction().await?;

        let result = sqlx::query(
            "UPDATE posts SET cached_like_count = (
                SELECT COUNT(*) FROM post_likes WHERE post_likes.post_id = posts.id
            )",
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to recompute like counts: {}", e))
        })?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(posts = result.rows_affected(), "recomputed cached like counts");
        Ok(())
    }
}
