//! Tweet endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch},
};
use vidhub_common::{AppResult, EntityId};
use vidhub_core::views::{PageRequest, Paginated, TweetRow, TweetView};

use super::{ContentRequest, PageQuery};
use crate::{
    extractors::{AuthUser, Json, Query},
    middleware::AppState,
    response::ApiResponse,
};

/// Every tweet, newest first.
async fn list_tweets(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<TweetView>>> {
    let tweets = state
        .tweet_service
        .list_all(PageRequest::new(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(tweets).message("Tweets fetched successfully"))
}

async fn create_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ContentRequest>,
) -> AppResult<ApiResponse<TweetRow>> {
    let tweet = state.tweet_service.create(&user.id, &req.content).await?;
    Ok(ApiResponse::created(tweet).message("Tweet created successfully"))
}

async fn user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<TweetView>>> {
    let user_id = EntityId::parse(&user_id, "user")?;
    let tweets = state.tweet_service.list_user_tweets(user_id.as_str()).await?;
    Ok(ApiResponse::ok(tweets).message("User tweets fetched successfully"))
}

async fn update_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    Json(req): Json<ContentRequest>,
) -> AppResult<ApiResponse<TweetRow>> {
    let tweet_id = EntityId::parse(&tweet_id, "tweet")?;
    let tweet = state
        .tweet_service
        .update(tweet_id.as_str(), &user.id, &req.content)
        .await?;
    Ok(ApiResponse::ok(tweet).message("Tweet updated successfully"))
}

async fn delete_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let tweet_id = EntityId::parse(&tweet_id, "tweet")?;
    state.tweet_service.delete(tweet_id.as_str(), &user.id).await?;
    Ok(ApiResponse::ok(()).message("Tweet deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tweets).post(create_tweet))
        .route("/user/{user_id}", get(user_tweets))
        .route("/{tweet_id}", patch(update_tweet).delete(delete_tweet))
}
