//! Subscription endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use vidhub_common::{AppResult, EntityId};
use vidhub_core::{ToggleOutcome, views::UserSummary};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, ToggleState},
};

/// Subscribe or unsubscribe. Both outcomes answer 200.
async fn toggle_subscription(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<ToggleState>> {
    let channel_id = EntityId::parse(&channel_id, "channel")?;
    let outcome = state
        .subscription_service
        .toggle(&user.id, channel_id)
        .await?;

    let message = match outcome {
        ToggleOutcome::Added => "Subscribed successfully",
        ToggleOutcome::Removed => "Unsubscribed successfully",
    };
    Ok(ApiResponse::ok(ToggleState { state: outcome }).message(message))
}

async fn channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<Vec<UserSummary>>> {
    let channel_id = EntityId::parse(&channel_id, "channel")?;
    let users = state
        .subscription_service
        .channel_subscribers(channel_id.as_str())
        .await?;
    Ok(ApiResponse::ok(users).message("Subscribers fetched successfully"))
}

async fn subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
) -> AppResult<ApiResponse<Vec<UserSummary>>> {
    let subscriber_id = EntityId::parse(&subscriber_id, "subscriber")?;
    let channels = state
        .subscription_service
        .subscribed_channels(subscriber_id.as_str())
        .await?;
    Ok(ApiResponse::ok(channels).message("Subscribed channels fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/c/{channel_id}",
            get(channel_subscribers).post(toggle_subscription),
        )
        .route("/u/{subscriber_id}", get(subscribed_channels))
}
