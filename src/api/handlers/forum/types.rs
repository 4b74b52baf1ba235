//! Request/response types for posts and replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A post joined with its author's display name.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A reply, always scoped by its parent post.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reply {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Body for creating or editing a post/reply.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PostText {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn post_serializes_with_flat_author_fields() {
        let post = Post {
            id: 1,
            user_id: 7,
            username: "alice".to_string(),
            text: "hello".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&post).expect("json");
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["username"], "alice");
        assert!(json.get("author").is_none());
    }

    #[test]
    fn reply_round_trips() {
        let reply = Reply {
            id: 3,
            post_id: 1,
            user_id: 7,
            username: "alice".to_string(),
            text: "hi".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_string(&reply).expect("json");
        let back: Reply = serde_json::from_str(&json).expect("reply");
        assert_eq!(back, reply);
    }
}
