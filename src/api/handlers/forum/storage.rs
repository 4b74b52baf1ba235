//! Database helpers for posts and replies.
//!
//! Reads join `users` so every row comes back with the author's display name.
//! Reply statements always conjoin `id` and `post_id`; a reply id under a
//! different post does not match.

use anyhow::{Context, Result};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;

use super::types::{Post, Reply};

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23503"),
        _ => false,
    }
}

fn row_to_post(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        text: row.get("text"),
        created_at: row.get("created_at"),
    }
}

fn row_to_reply(row: &PgRow) -> Reply {
    Reply {
        id: row.get("id"),
        post_id: row.get("post_id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        text: row.get("text"),
        created_at: row.get("created_at"),
    }
}

pub(super) async fn insert_post(pool: &PgPool, author_id: i64, text: &str) -> Result<Post> {
    let query = r"
        WITH inserted AS (
            INSERT INTO posts (author, text) VALUES ($1, $2) RETURNING *
        )
        SELECT inserted.id, inserted.author AS user_id, users.username,
               inserted.text, inserted.created_at
        FROM inserted
        JOIN users ON users.id = inserted.author
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(author_id)
        .bind(text)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert post")?;
    Ok(row_to_post(&row))
}

pub(super) async fn list_posts(pool: &PgPool) -> Result<Vec<Post>> {
    let query = r"
        SELECT posts.id, posts.author AS user_id, users.username,
               posts.text, posts.created_at
        FROM posts
        JOIN users ON users.id = posts.author
        ORDER BY posts.id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list posts")?;
    Ok(rows.iter().map(row_to_post).collect())
}

pub(super) async fn fetch_post(pool: &PgPool, post_id: i64) -> Result<Option<Post>> {
    let query = r"
        SELECT posts.id, posts.author AS user_id, users.username,
               posts.text, posts.created_at
        FROM posts
        JOIN users ON users.id = posts.author
        WHERE posts.id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(post_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch post")?;
    Ok(row.as_ref().map(row_to_post))
}

/// Author id only, for the ownership check in front of mutations.
pub(super) async fn post_author(pool: &PgPool, post_id: i64) -> Result<Option<i64>> {
    let query = "SELECT author FROM posts WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(post_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch post author")?;
    Ok(row.map(|row| row.get("author")))
}

pub(super) async fn update_post_text(
    pool: &PgPool,
    post_id: i64,
    text: &str,
) -> Result<Option<Post>> {
    let query = r"
        WITH updated AS (
            UPDATE posts SET text = $2 WHERE id = $1 RETURNING *
        )
        SELECT updated.id, updated.author AS user_id, users.username,
               updated.text, updated.created_at
        FROM updated
        JOIN users ON users.id = updated.author
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(post_id)
        .bind(text)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update post")?;
    Ok(row.as_ref().map(row_to_post))
}

pub(super) async fn delete_post(pool: &PgPool, post_id: i64) -> Result<u64> {
    let query = "DELETE FROM posts WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(post_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete post")?;
    Ok(result.rows_affected())
}

/// Insert a reply under `post_id`. Returns `None` when the parent post does
/// not exist (foreign key violation), which callers surface as not-found.
pub(super) async fn insert_reply(
    pool: &PgPool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Option<Reply>> {
    let query = r"
        WITH inserted AS (
            INSERT INTO replies (post_id, author, text) VALUES ($1, $2, $3) RETURNING *
        )
        SELECT inserted.id, inserted.post_id, inserted.author AS user_id,
               users.username, inserted.text, inserted.created_at
        FROM inserted
        JOIN users ON users.id = inserted.author
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match result {
        Ok(row) => Ok(Some(row_to_reply(&row))),
        Err(err) if is_foreign_key_violation(&err) => Ok(None),
        Err(err) => Err(err).context("failed to insert reply"),
    }
}

pub(super) async fn list_replies(pool: &PgPool, post_id: i64) -> Result<Vec<Reply>> {
    let query = r"
        SELECT replies.id, replies.post_id, replies.author AS user_id,
               users.username, replies.text, replies.created_at
        FROM replies
        JOIN users ON users.id = replies.author
        WHERE replies.post_id = $1
        ORDER BY replies.id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(post_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list replies")?;
    Ok(rows.iter().map(row_to_reply).collect())
}

pub(super) async fn fetch_reply(
    pool: &PgPool,
    post_id: i64,
    reply_id: i64,
) -> Result<Option<Reply>> {
    let query = r"
        SELECT replies.id, replies.post_id, replies.author AS user_id,
               users.username, replies.text, replies.created_at
        FROM replies
        JOIN users ON users.id = replies.author
        WHERE replies.id = $1 AND replies.post_id = $2
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(reply_id)
        .bind(post_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch reply")?;
    Ok(row.as_ref().map(row_to_reply))
}

pub(super) async fn reply_author(
    pool: &PgPool,
    post_id: i64,
    reply_id: i64,
) -> Result<Option<i64>> {
    let query = "SELECT author FROM replies WHERE id = $1 AND post_id = $2";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(reply_id)
        .bind(post_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch reply author")?;
    Ok(row.map(|row| row.get("author")))
}

pub(super) async fn update_reply_text(
    pool: &PgPool,
    post_id: i64,
    reply_id: i64,
    text: &str,
) -> Result<Option<Reply>> {
    let query = r"
        WITH updated AS (
            UPDATE replies SET text = $3 WHERE id = $1 AND post_id = $2 RETURNING *
        )
        SELECT updated.id, updated.post_id, updated.author AS user_id,
               users.username, updated.text, updated.created_at
        FROM updated
        JOIN users ON users.id = updated.author
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(reply_id)
        .bind(post_id)
        .bind(text)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update reply")?;
    Ok(row.as_ref().map(row_to_reply))
}

pub(super) async fn delete_reply(pool: &PgPool, post_id: i64, reply_id: i64) -> Result<u64> {
    let query = "DELETE FROM replies WHERE id = $1 AND post_id = $2";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(reply_id)
        .bind(post_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete reply")?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::is_foreign_key_violation;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::ForeignKeyViolation
        }
    }

    #[test]
    fn is_foreign_key_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23503"),
        }));
        assert!(is_foreign_key_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(!is_foreign_key_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_foreign_key_violation(&err));
    }
}
