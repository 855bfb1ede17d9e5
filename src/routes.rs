// HTTP surface - axum router, handlers, and the caller-identity extractor
//
// Identity arrives as an `X-User-Id` header; authenticating that identity is
// an upstream concern and not handled here.

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    models::{PostLike, PostView, User},
};

/// Caller identity taken from the `X-User-Id` header.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok())
            .map(CurrentUser)
            .ok_or_else(|| {
                AppError::Unauthorized("Missing or invalid X-User-Id header".to_string())
            });

        async move { user }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/users", get(find_user).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).delete(delete_post))
        .route("/posts/{id}/like", put(create_like).delete(delete_like))
        .route("/posts/{id}/likes", get(list_likes))
        .with_state(state);

    Router::new().nest("/api/v1", api)
}

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    username: String,
}

#[derive(Debug, Deserialize)]
struct CreatePostRequest {
    body: String,
}

#[derive(Debug, Deserialize)]
struct UserLookup {
    username: String,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

async fn health(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.db.health_check().await?;
    Ok(Json(json!({"status": "ok"})))
}

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<Json<User>> {
    let user = state.users.create_user(request.username).await?;
    Ok(Json(user))
}

async fn find_user(
    State(state): State<AppState>,
    Query(params): Query<UserLookup>,
) -> AppResult<Json<User>> {
    match state.users.get_user_by_name(&params.username).await? {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::NotFound(format!(
            "User '{}' not found",
            params.username
        ))),
    }
}

async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<User>> {
    match state.users.get_user(id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::NotFound(format!("User {} not found", id))),
    }
}

async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<PostView>>> {
    if params.page < 1 || params.page_size < 1 || params.page_size > 100 {
        return Err(AppError::BadRequest(
            "Invalid pagination parameters".to_string(),
        ));
    }

    let posts = state.posts.get_posts(params.page, params.page_size).await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostView>> {
    match state.posts.get_post_view(id).await? {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CreatePostRequest>,
) -> AppResult<Json<Value>> {
    let author = require_user(&state, user_id).await?;
    let post = state.posts.create_post(author.id, request.body).await?;
    Ok(Json(
        json!({"id": post.id, "author_id": post.author_id, "created_at": post.created_at}),
    ))
}

async fn delete_post(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Value>> {
    if !state.posts.delete_post(id).await? {
        return Err(AppError::NotFound(
            "The specified post cannot be found".to_string(),
        ));
    }
    Ok(Json(json!({"id": id, "deleted": true})))
}

async fn create_like(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(post_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let user = require_user(&state, user_id).await?;

    if state.posts.get_post(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Post {} not found", post_id)));
    }

    if !state.likes.create_like(user.id, post_id).await? {
        return Err(AppError::BadRequest(
            "The current user has already liked this post".to_string(),
        ));
    }

    Ok(Json(json!({"post_id": post_id, "liked": true})))
}

async fn list_likes(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<Json<Vec<PostLike>>> {
    if state.posts.get_post(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Post {} not found", post_id)));
    }

    let likes = state.likes.get_likes(post_id).await?;
    Ok(Json(likes))
}

async fn delete_like(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(post_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let user = require_user(&state, user_id).await?;

    if state.posts.get_post(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Post {} not found", post_id)));
    }

    if !state.likes.delete_like(user.id, post_id).await? {
        return Err(AppError::BadRequest(
            "The current user has not liked this post yet".to_string(),
        ));
    }

    Ok(Json(json!({"post_id": post_id, "liked": false})))
}

async fn require_user(state: &AppState, user_id: i64) -> AppResult<User> {
    state
        .users
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown user {}", user_id)))
}
