//! Ownership-gated operations on posts and replies.
//!
//! Both resource kinds share one gate: fetch the author under the operation's
//! qualified key, then `check_author`. The existence check runs first, so a
//! mutation against a nonexistent resource is not-found for everyone,
//! including non-authors.
//!
//! The author check and the following mutation are two separate statements,
//! each atomic on its own; no transaction spans them. A row deleted between
//! the two makes the mutation match zero rows, which surfaces as not-found.
//! Concurrent edits by the same author are last-writer-wins.

use sqlx::PgPool;

use crate::api::error::Error;

use super::{
    storage,
    types::{Post, Reply},
};

/// The ownership invariant, shared by every mutation on every resource kind.
fn check_author(author: Option<i64>, requester_id: i64) -> Result<(), Error> {
    match author {
        None => Err(Error::NotFound),
        Some(author) if author != requester_id => Err(Error::Forbidden),
        Some(_) => Ok(()),
    }
}

pub(super) async fn create_post(
    pool: &PgPool,
    author_id: i64,
    text: &str,
) -> Result<Post, Error> {
    Ok(storage::insert_post(pool, author_id, text).await?)
}

pub(super) async fn read_post(pool: &PgPool, post_id: i64) -> Result<Post, Error> {
    storage::fetch_post(pool, post_id).await?.ok_or(Error::NotFound)
}

pub(super) async fn list_posts(pool: &PgPool) -> Result<Vec<Post>, Error> {
    Ok(storage::list_posts(pool).await?)
}

pub(super) async fn update_post(
    pool: &PgPool,
    post_id: i64,
    requester_id: i64,
    text: &str,
) -> Result<Post, Error> {
    let author = storage::post_author(pool, post_id).await?;
    check_author(author, requester_id)?;

    storage::update_post_text(pool, post_id, text)
        .await?
        .ok_or(Error::NotFound)
}

pub(super) async fn delete_post(
    pool: &PgPool,
    post_id: i64,
    requester_id: i64,
) -> Result<(), Error> {
    let author = storage::post_author(pool, post_id).await?;
    check_author(author, requester_id)?;

    if storage::delete_post(pool, post_id).await? == 0 {
        return Err(Error::NotFound);
    }
    Ok(())
}

/// A missing parent post surfaces as not-found, not as a server fault.
pub(super) async fn create_reply(
    pool: &PgPool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Reply, Error> {
    storage::insert_reply(pool, post_id, author_id, text)
        .await?
        .ok_or(Error::NotFound)
}

pub(super) async fn read_reply(
    pool: &PgPool,
    post_id: i64,
    reply_id: i64,
) -> Result<Reply, Error> {
    storage::fetch_reply(pool, post_id, reply_id)
        .await?
        .ok_or(Error::NotFound)
}

pub(super) async fn list_replies(pool: &PgPool, post_id: i64) -> Result<Vec<Reply>, Error> {
    Ok(storage::list_replies(pool, post_id).await?)
}

pub(super) async fn update_reply(
    pool: &PgPool,
    post_id: i64,
    reply_id: i64,
    requester_id: i64,
    text: &str,
) -> Result<Reply, Error> {
    let author = storage::reply_author(pool, post_id, reply_id).await?;
    check_author(author, requester_id)?;

    storage::update_reply_text(pool, post_id, reply_id, text)
        .await?
        .ok_or(Error::NotFound)
}

pub(super) async fn delete_reply(
    pool: &PgPool,
    post_id: i64,
    reply_id: i64,
    requester_id: i64,
) -> Result<(), Error> {
    let author = storage::reply_author(pool, post_id, reply_id).await?;
    check_author(author, requester_id)?;

    if storage::delete_reply(pool, post_id, reply_id).await? == 0 {
        return Err(Error::NotFound);
    }
    Ok(())
}
