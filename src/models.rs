use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: i64,
    /// Denormalized count of post_likes rows for this post. Mutated only by
    /// the like write path and the reconciliation pass.
    pub cached_like_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostLike {
    pub post_id: i64,
    pub user_id: i64,
    pub created_at: i64,
}

/// Feed-facing shape of a post: author resolved to a username, the cached
/// counter exposed as `like_count`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostView {
    pub id: i64,
    pub content: String,
    pub created_at: i64,
    pub like_count: i64,
    pub author: String,
}
