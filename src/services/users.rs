use std::sync::Arc;

use chrono::Utc;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::User;

pub const MAX_USERNAME_LENGTH: usize = 32;

#[derive(Clone)]
pub struct UsersService {
    db: Arc<Database>,
}

impl UsersService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, username: String) -> AppResult<User> {
        let length = username.chars().count();
        if length == 0 || length > MAX_USERNAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Username must be between 1 and {} characters",
                MAX_USERNAME_LENGTH
            )));
        }

        let now = Utc::now().timestamp();
        let result = sqlx::query("INSERT INTO users (username, created_at) VALUES (?, ?)")
            .bind(&username)
            .bind(now)
            .execute(&self.db.pool)
            .await;

        match result {
            Ok(result) => Ok(User {
                id: result.last_insert_rowid(),
                username,
                created_at: now,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::BadRequest(format!("Username '{}' is already taken", username)),
            ),
            Err(e) => Err(AppError::DatabaseError(format!(
                "Failed to create user: {}",
                e
            ))),
        }
    }

    pub async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to get user {}: {}", id, e)))
    }

    pub async fn get_user_by_name(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.db.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to get user '{}': {}", username, e))
            })
    }

    /// Delete a user; their posts and likes cascade away with them.
    pub async fn delete_user(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.db.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete user {}: {}", id, e)))?;

        Ok(result.rows_affected() > 0)
    }
}
