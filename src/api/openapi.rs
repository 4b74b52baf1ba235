//! OpenAPI document wiring.
//!
//! Every documented route carries a `#[utoipa::path]` annotation; `ApiDoc`
//! aggregates them. The spec is served at `/api-docs/openapi.json` and can be
//! printed with the `openapi` binary.

use axum::Json;
use utoipa::OpenApi;

use super::handlers::{
    auth::types::{Credentials, SessionResponse, StatusResponse},
    forum::types::{Post, PostText, Reply},
    health::Health,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::session::session,
        crate::api::handlers::auth::session::logout,
        crate::api::handlers::forum::create_post,
        crate::api::handlers::forum::list_posts,
        crate::api::handlers::forum::read_post,
        crate::api::handlers::forum::update_post,
        crate::api::handlers::forum::delete_post,
        crate::api::handlers::forum::create_reply,
        crate::api::handlers::forum::list_replies,
        crate::api::handlers::forum::read_reply,
        crate::api::handlers::forum::update_reply,
        crate::api::handlers::forum::delete_reply,
    ),
    components(schemas(
        Credentials,
        SessionResponse,
        StatusResponse,
        Health,
        Post,
        PostText,
        Reply
    )),
    tags(
        (name = "auth", description = "Registration, login, and session management"),
        (name = "posts", description = "Posts and their replies"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub(crate) async fn serve() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn openapi_tags_and_paths() {
        let spec = openapi();
        let tags = spec.tags.clone().unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "auth"));
        assert!(tags.iter().any(|tag| tag.name == "posts"));
        assert!(spec.paths.paths.contains_key("/register"));
        assert!(spec.paths.paths.contains_key("/post/all"));
        assert!(
            spec.paths
                .paths
                .contains_key("/post/{post_id}/reply/{reply_id}")
        );
    }
}
