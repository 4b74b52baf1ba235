use axum::response::IntoResponse;

// axum handler for the service banner
pub async fn root() -> impl IntoResponse {
    crate::APP_USER_AGENT
}
