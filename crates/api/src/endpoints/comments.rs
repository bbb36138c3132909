//! Comment endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch},
};
use vidhub_common::{AppResult, EntityId};
use vidhub_core::views::{CommentRow, CommentView, PageRequest, Paginated};

use super::{ContentRequest, PageQuery};
use crate::{
    extractors::{AuthUser, Json, Query},
    middleware::AppState,
    response::ApiResponse,
};

async fn list_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<CommentView>>> {
    let video_id = EntityId::parse(&video_id, "video")?;
    let comments = state
        .comment_service
        .list_for_video(video_id.as_str(), PageRequest::new(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(comments).message("Comments fetched successfully"))
}

async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Json(req): Json<ContentRequest>,
) -> AppResult<ApiResponse<CommentRow>> {
    let video_id = EntityId::parse(&video_id, "video")?;
    let comment = state
        .comment_service
        .add(video_id.as_str(), &user.id, &req.content)
        .await?;
    Ok(ApiResponse::created(comment).message("Comment added successfully"))
}

async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(req): Json<ContentRequest>,
) -> AppResult<ApiResponse<CommentRow>> {
    let comment_id = EntityId::parse(&comment_id, "comment")?;
    let comment = state
        .comment_service
        .update(comment_id.as_str(), &user.id, &req.content)
        .await?;
    Ok(ApiResponse::ok(comment).message("Comment updated successfully"))
}

async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let comment_id = EntityId::parse(&comment_id, "comment")?;
    state
        .comment_service
        .delete(comment_id.as_str(), &user.id)
        .await?;
    Ok(ApiResponse::ok(()).message("Comment deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{video_id}", get(list_comments).post(add_comment))
        .route("/c/{comment_id}", patch(update_comment).delete(delete_comment))
}
