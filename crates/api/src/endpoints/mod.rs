//! API endpoints.

mod comments;
mod dashboard;
mod health;
mod likes;
mod playlists;
mod subscriptions;
mod tweets;
mod users;
mod videos;

use std::time::Duration;

use axum::{BoxError, Router, error_handling::HandleErrorLayer};
use serde::Deserialize;
use tower::{ServiceBuilder, timeout::error::Elapsed};
use vidhub_common::{AppError, ServerConfig};

use crate::middleware::AppState;

/// Create the API router.
///
/// Video routes carry uploads: their bodies are capped at
/// `max_upload_bytes` and they run under `upload_timeout_secs` instead of
/// the general `request_timeout_secs`.
pub fn router(server: &ServerConfig) -> Router<AppState> {
    let general = Router::new()
        .merge(health::router())
        .nest("/users", users::router())
        .nest("/comments", comments::router())
        .nest("/tweets", tweets::router())
        .nest("/likes", likes::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/playlists", playlists::router())
        .nest("/dashboard", dashboard::router());

    with_timeout(general, server.request_timeout_secs).nest(
        "/videos",
        with_timeout(
            videos::router(server.max_upload_bytes),
            server.upload_timeout_secs,
        ),
    )
}

/// Bound every route of `router` by `secs`, answering 408 when it elapses.
fn with_timeout<S>(router: Router<S>, secs: u64) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(timeout_error))
            .timeout(Duration::from_secs(secs)),
    )
}

async fn timeout_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout
    } else {
        AppError::Unexpected(format!("Unhandled middleware error: {err}"))
    }
}

/// `?page=&limit=` query.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Body carrying a single text field.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentRequest {
    #[serde(default)]
    pub content: String,
}
