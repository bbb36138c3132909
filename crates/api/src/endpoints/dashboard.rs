//! Channel dashboard endpoints.

use axum::{Router, extract::State, routing::get};
use vidhub_common::AppResult;
use vidhub_core::views::{DashboardStats, VideoView};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = state.dashboard_service.stats(&user.id).await?;
    Ok(ApiResponse::ok(stats).message("Channel stats fetched successfully"))
}

async fn videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VideoView>>> {
    let videos = state.dashboard_service.channel_videos(&user.id).await?;
    Ok(ApiResponse::ok(videos).message("Channel videos fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/videos", get(videos))
}
