//! Like endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use vidhub_common::{AppResult, EntityId};
use vidhub_core::views::{CommentRow, TweetRow, VideoView, WithOwner};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, ToggleState},
};

async fn toggle_video_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<ToggleState>> {
    let video_id = EntityId::parse(&video_id, "video")?;
    let outcome = state.like_service.toggle_video_like(video_id, &user.id).await?;
    Ok(ApiResponse::toggled(outcome, "Video liked", "Video unliked"))
}

async fn toggle_comment_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<ToggleState>> {
    let comment_id = EntityId::parse(&comment_id, "comment")?;
    let outcome = state
        .like_service
        .toggle_comment_like(comment_id, &user.id)
        .await?;
    Ok(ApiResponse::toggled(outcome, "Comment liked", "Comment unliked"))
}

async fn toggle_tweet_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<ToggleState>> {
    let tweet_id = EntityId::parse(&tweet_id, "tweet")?;
    let outcome = state.like_service.toggle_tweet_like(tweet_id, &user.id).await?;
    Ok(ApiResponse::toggled(outcome, "Tweet liked", "Tweet unliked"))
}

async fn liked_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<WithOwner<VideoView>>>> {
    let videos = state.like_service.liked_videos(&user.id).await?;
    Ok(ApiResponse::ok(videos).message("Liked videos fetched successfully"))
}

async fn liked_comments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<WithOwner<CommentRow>>>> {
    let comments = state.like_service.liked_comments(&user.id).await?;
    Ok(ApiResponse::ok(comments).message("Liked comments fetched successfully"))
}

async fn liked_tweets(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<WithOwner<TweetRow>>>> {
    let tweets = state.like_service.liked_tweets(&user.id).await?;
    Ok(ApiResponse::ok(tweets).message("Liked tweets fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle/v/{video_id}", post(toggle_video_like))
        .route("/toggle/c/{comment_id}", post(toggle_comment_like))
        .route("/toggle/t/{tweet_id}", post(toggle_tweet_like))
        .route("/videos", get(liked_videos))
        .route("/comments", get(liked_comments))
        .route("/tweets", get(liked_tweets))
}
