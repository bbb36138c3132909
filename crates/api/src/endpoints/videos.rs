//! Video endpoints.

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartRejection},
    routing::{get, patch},
};
use vidhub_common::{AppError, AppResult, EntityId};
use vidhub_core::{
    PublishVideoInput, UpdateVideoInput, VideoListQuery,
    views::{Paginated, VideoDetails, VideoListItem, VideoView},
};

use crate::{
    extractors::{AuthUser, MaybeAuthUser, Query},
    middleware::AppState,
    response::ApiResponse,
    upload::MultipartForm,
};

const VIDEO_FILE: &str = "videoFile";
const THUMBNAIL: &str = "thumbnail";

/// List videos, paginated.
async fn list_videos(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<VideoListQuery>,
) -> AppResult<ApiResponse<Paginated<VideoListItem>>> {
    let page = state.video_service.list(&query, viewer.id()).await?;
    Ok(ApiResponse::ok(page).message("Videos fetched successfully"))
}

/// Upload a video with its thumbnail.
async fn publish_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<ApiResponse<VideoView>> {
    let form = MultipartForm::read(multipart?, &[VIDEO_FILE, THUMBNAIL]).await?;

    let (Some(title), Some(description)) = (form.text("title"), form.text("description")) else {
        return Err(AppError::BadRequest(
            "Title and description are required".to_string(),
        ));
    };
    let (Some(video_file), Some(thumbnail)) = (form.file(VIDEO_FILE), form.file(THUMBNAIL)) else {
        return Err(AppError::BadRequest(
            "Video file and thumbnail are required".to_string(),
        ));
    };

    let input = PublishVideoInput {
        title: title.to_string(),
        description: description.to_string(),
    };

    let video = state
        .video_service
        .publish(&user.id, input, video_file.path(), thumbnail.path())
        .await?;

    Ok(ApiResponse::created(video).message("Video published successfully"))
}

/// Show one video. Counts the view.
async fn get_video(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<VideoDetails>> {
    let video_id = EntityId::parse(&video_id, "video")?;
    let video = state
        .video_service
        .get_for_viewer(video_id.as_str(), viewer.id())
        .await?;
    Ok(ApiResponse::ok(video).message("Video fetched successfully"))
}

/// Update title, description or thumbnail.
async fn update_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<ApiResponse<VideoView>> {
    let video_id = EntityId::parse(&video_id, "video")?;
    let form = MultipartForm::read(multipart?, &[THUMBNAIL]).await?;

    let input = UpdateVideoInput {
        title: form.text("title").map(ToString::to_string),
        description: form.text("description").map(ToString::to_string),
    };

    let video = state
        .video_service
        .update(
            video_id.as_str(),
            &user.id,
            input,
            form.file(THUMBNAIL).map(|f| f.path()),
        )
        .await?;

    Ok(ApiResponse::ok(video).message("Video updated successfully"))
}

async fn delete_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let video_id = EntityId::parse(&video_id, "video")?;
    state.video_service.delete(video_id.as_str(), &user.id).await?;
    Ok(ApiResponse::ok(()).message("Video deleted successfully"))
}

async fn toggle_publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<VideoView>> {
    let video_id = EntityId::parse(&video_id, "video")?;
    let video = state
        .video_service
        .toggle_publish(video_id.as_str(), &user.id)
        .await?;
    Ok(ApiResponse::ok(video).message("Publish status toggled"))
}

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(publish_video))
        .route(
            "/{video_id}",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/{video_id}/toggle-publish", patch(toggle_publish))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
