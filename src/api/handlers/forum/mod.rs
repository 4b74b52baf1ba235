//! Post and reply endpoints.
//!
//! Reads are unauthenticated. Every mutation first resolves the session token
//! to a user id, then runs through the ownership gate in [`service`].

mod service;
mod storage;
pub mod types;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;

use self::types::PostText;
use super::{
    auth::{session, AuthState},
    valid_text,
};

#[utoipa::path(
    post,
    path= "/post",
    request_body = PostText,
    responses (
        (status = 200, description = "Post created", body = types::Post),
        (status = 400, description = "Missing token or malformed payload"),
        (status = 401, description = "Invalid or expired token"),
    ),
    tag= "posts"
)]
pub async fn create_post(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    headers: HeaderMap,
    payload: Option<Json<PostText>>,
) -> impl IntoResponse {
    let requester_id = match session::authenticate(&headers, &pool, &auth_state).await {
        Ok(user_id) => user_id,
        Err(err) => return err.into_response(),
    };

    let Some(Json(body)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };
    if !valid_text(&body.text) {
        return (StatusCode::BAD_REQUEST, "Invalid text".to_string()).into_response();
    }

    match service::create_post(&pool, requester_id, &body.text).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path= "/post/all",
    responses (
        (status = 200, description = "All posts", body = [types::Post]),
    ),
    tag= "posts"
)]
pub async fn list_posts(pool: Extension<PgPool>) -> impl IntoResponse {
    match service::list_posts(&pool).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path= "/post/{post_id}",
    params(("post_id" = i64, Path, description = "Post id")),
    responses (
        (status = 200, description = "The post", body = types::Post),
        (status = 404, description = "Post does not exist"),
    ),
    tag= "posts"
)]
pub async fn read_post(pool: Extension<PgPool>, Path(post_id): Path<i64>) -> impl IntoResponse {
    match service::read_post(&pool, post_id).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    patch,
    path= "/post/{post_id}",
    params(("post_id" = i64, Path, description = "Post id")),
    request_body = PostText,
    responses (
        (status = 200, description = "Updated post", body = types::Post),
        (status = 401, description = "Requester is not the author, or token invalid"),
        (status = 404, description = "Post does not exist"),
    ),
    tag= "posts"
)]
pub async fn update_post(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path(post_id): Path<i64>,
    headers: HeaderMap,
    payload: Option<Json<PostText>>,
) -> impl IntoResponse {
    let requester_id = match session::authenticate(&headers, &pool, &auth_state).await {
        Ok(user_id) => user_id,
        Err(err) => return err.into_response(),
    };

    let Some(Json(body)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };
    if !valid_text(&body.text) {
        return (StatusCode::BAD_REQUEST, "Invalid text".to_string()).into_response();
    }

    match service::update_post(&pool, post_id, requester_id, &body.text).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path= "/post/{post_id}",
    params(("post_id" = i64, Path, description = "Post id")),
    responses (
        (status = 200, description = "Post deleted"),
        (status = 401, description = "Requester is not the author, or token invalid"),
        (status = 404, description = "Post does not exist"),
    ),
    tag= "posts"
)]
pub async fn delete_post(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path(post_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let requester_id = match session::authenticate(&headers, &pool, &auth_state).await {
        Ok(user_id) => user_id,
        Err(err) => return err.into_response(),
    };

    match service::delete_post(&pool, post_id, requester_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path= "/post/{post_id}/reply",
    params(("post_id" = i64, Path, description = "Parent post id")),
    request_body = PostText,
    responses (
        (status = 200, description = "Reply created", body = types::Reply),
        (status = 401, description = "Invalid or expired token"),
        (status = 404, description = "Parent post does not exist"),
    ),
    tag= "posts"
)]
pub async fn create_reply(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path(post_id): Path<i64>,
    headers: HeaderMap,
    payload: Option<Json<PostText>>,
) -> impl IntoResponse {
    let requester_id = match session::authenticate(&headers, &pool, &auth_state).await {
        Ok(user_id) => user_id,
        Err(err) => return err.into_response(),
    };

    let Some(Json(body)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };
    if !valid_text(&body.text) {
        return (StatusCode::BAD_REQUEST, "Invalid text".to_string()).into_response();
    }

    match service::create_reply(&pool, post_id, requester_id, &body.text).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path= "/post/{post_id}/reply/all",
    params(("post_id" = i64, Path, description = "Parent post id")),
    responses (
        (status = 200, description = "All replies under the post", body = [types::Reply]),
    ),
    tag= "posts"
)]
pub async fn list_replies(
    pool: Extension<PgPool>,
    Path(post_id): Path<i64>,
) -> impl IntoResponse {
    match service::list_replies(&pool, post_id).await {
        Ok(replies) => (StatusCode::OK, Json(replies)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path= "/post/{post_id}/reply/{reply_id}",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("reply_id" = i64, Path, description = "Reply id"),
    ),
    responses (
        (status = 200, description = "The reply", body = types::Reply),
        (status = 404, description = "No such reply under this post"),
    ),
    tag= "posts"
)]
pub async fn read_reply(
    pool: Extension<PgPool>,
    Path((post_id, reply_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    match service::read_reply(&pool, post_id, reply_id).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    patch,
    path= "/post/{post_id}/reply/{reply_id}",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("reply_id" = i64, Path, description = "Reply id"),
    ),
    request_body = PostText,
    responses (
        (status = 200, description = "Updated reply", body = types::Reply),
        (status = 401, description = "Requester is not the author, or token invalid"),
        (status = 404, description = "No such reply under this post"),
    ),
    tag= "posts"
)]
pub async fn update_reply(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path((post_id, reply_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    payload: Option<Json<PostText>>,
) -> impl IntoResponse {
    let requester_id = match session::authenticate(&headers, &pool, &auth_state).await {
        Ok(user_id) => user_id,
        Err(err) => return err.into_response(),
    };

    let Some(Json(body)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };
    if !valid_text(&body.text) {
        return (StatusCode::BAD_REQUEST, "Invalid text".to_string()).into_response();
    }

    match service::update_reply(&pool, post_id, reply_id, requester_id, &body.text).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path= "/post/{post_id}/reply/{reply_id}",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("reply_id" = i64, Path, description = "Reply id"),
    ),
    responses (
        (status = 200, description = "Reply deleted"),
        (status = 401, description = "Requester is not the author, or token invalid"),
        (status = 404, description = "No such reply under this post"),
    ),
    tag= "posts"
)]
pub async fn delete_reply(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path((post_id, reply_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let requester_id = match session::authenticate(&headers, &pool, &auth_state).await {
        Ok(user_id) => user_id,
        Err(err) => return err.into_response(),
    };

    match service::delete_reply(&pool, post_id, reply_id, requester_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}
