// HTTP surface tests - status mapping and response shapes

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use social_app::{app_state::AppState, routes};

async fn app() -> Router {
    routes::create_router(AppState::new_in_memory().await.unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, user: Option<i64>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str, user: Option<i64>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_user(app: &Router, username: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users",
            None,
            &json!({"username": username}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_post(app: &Router, user: i64, body: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/posts",
            Some(user),
            &json!({"body": body}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app().await;
    let response = app.oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_user_then_fetch_it() {
    let app = app().await;
    let id = create_user(&app, "alice").await;

    let response = app
        .oneshot(get(&format!("/api/v1/users/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn find_user_by_username() {
    let app = app().await;
    let id = create_user(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/users?username=alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"].as_i64().unwrap(), id);

    let response = app
        .oneshot(get("/api/v1/users?username=nobody"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = app().await;
    create_user(&app, "alice").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/users",
            None,
            &json!({"username": "alice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn creating_a_post_requires_identity() {
    let app = app().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/posts",
            None,
            &json!({"body": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_user_header_is_unauthorized() {
    let app = app().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/posts",
            Some(999),
            &json!({"body": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_post_content_is_rejected() {
    let app = app().await;
    let user = create_user(&app, "alice").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/posts",
            Some(user),
            &json!({"body": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_pagination_is_rejected() {
    let app = app().await;
    let response = app
        .oneshot(get("/api/v1/posts?page=0&page_size=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn feed_lists_newest_first_with_like_counts() {
    let app = app().await;
    let user = create_user(&app, "alice").await;
    let first = create_post(&app, user, "first").await;
    let second = create_post(&app, user, "second").await;

    let like = app
        .clone()
        .oneshot(empty_request(
            "PUT",
            &format!("/api/v1/posts/{}/like", second),
            Some(user),
        ))
        .await
        .unwrap();
    assert_eq!(like.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/v1/posts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let posts = body.as_array().unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"].as_i64().unwrap(), second);
    assert_eq!(posts[0]["like_count"], 1);
    assert_eq!(posts[0]["author"], "alice");
    assert_eq!(posts[1]["id"].as_i64().unwrap(), first);
    assert_eq!(posts[1]["like_count"], 0);
}

#[tokio::test]
async fn like_status_mapping_matches_core_outcomes() {
    let app = app().await;
    let user = create_user(&app, "alice").await;
    let post = create_post(&app, user, "likeable").await;
    let like_uri = format!("/api/v1/posts/{}/like", post);

    // Unlike before liking: expected no-op, 400
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &like_uri, Some(user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // First like succeeds
    let response = app
        .clone()
        .oneshot(empty_request("PUT", &like_uri, Some(user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Second like is the duplicate path, 400
    let response = app
        .clone()
        .oneshot(empty_request("PUT", &like_uri, Some(user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unlike succeeds once
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &like_uri, Some(user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/v1/posts/{}", post)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["like_count"], 0);
}

#[tokio::test]
async fn listing_likes_shows_who_liked() {
    let app = app().await;
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let post = create_post(&app, alice, "popular").await;

    for user in [alice, bob] {
        let response = app
            .clone()
            .oneshot(empty_request(
                "PUT",
                &format!("/api/v1/posts/{}/like", post),
                Some(user),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/posts/{}/likes", post)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let likes = body.as_array().unwrap();
    assert_eq!(likes.len(), 2);
    let likers: Vec<i64> = likes
        .iter()
        .map(|like| like["user_id"].as_i64().unwrap())
        .collect();
    assert!(likers.contains(&alice));
    assert!(likers.contains(&bob));

    let response = app
        .oneshot(get("/api/v1/posts/9999/likes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn liking_a_missing_post_is_not_found() {
    let app = app().await;
    let user = create_user(&app, "alice").await;

    let response = app
        .oneshot(empty_request("PUT", "/api/v1/posts/9999/like", Some(user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_post_removes_it_from_the_api() {
    let app = app().await;
    let user = create_user(&app, "alice").await;
    let post = create_post(&app, user, "short-lived").await;

    let response = app
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/v1/posts/{}", post),
            Some(user),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/v1/posts/{}", post)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
