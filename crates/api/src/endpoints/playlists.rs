//! Playlist endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::Deserialize;
use vidhub_common::{AppResult, EntityId};
use vidhub_core::views::PlaylistView;

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Create playlist request.
#[derive(Debug, Deserialize)]
struct CreatePlaylistRequest {
    #[serde(default)]
    name: String,
    description: Option<String>,
}

/// Update playlist request.
#[derive(Debug, Deserialize)]
struct UpdatePlaylistRequest {
    name: Option<String>,
    description: Option<String>,
}

async fn create_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePlaylistRequest>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let playlist = state
        .playlist_service
        .create(&user.id, &req.name, req.description.as_deref())
        .await?;
    Ok(ApiResponse::created(playlist).message("Playlist created successfully"))
}

async fn user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<PlaylistView>>> {
    let user_id = EntityId::parse(&user_id, "user")?;
    let playlists = state.playlist_service.user_playlists(user_id.as_str()).await?;
    Ok(ApiResponse::ok(playlists).message("User playlists fetched successfully"))
}

async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let playlist_id = EntityId::parse(&playlist_id, "playlist")?;
    let playlist = state.playlist_service.get_by_id(playlist_id.as_str()).await?;
    Ok(ApiResponse::ok(playlist).message("Playlist fetched successfully"))
}

async fn update_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    Json(req): Json<UpdatePlaylistRequest>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let playlist_id = EntityId::parse(&playlist_id, "playlist")?;
    let playlist = state
        .playlist_service
        .update(
            playlist_id.as_str(),
            &user.id,
            req.name.as_deref(),
            req.description.as_deref(),
        )
        .await?;
    Ok(ApiResponse::ok(playlist).message("Playlist updated successfully"))
}

async fn delete_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let playlist_id = EntityId::parse(&playlist_id, "playlist")?;
    state
        .playlist_service
        .delete(playlist_id.as_str(), &user.id)
        .await?;
    Ok(ApiResponse::ok(()).message("Playlist deleted successfully"))
}

fn parse_pair(video_id: &str, playlist_id: &str) -> AppResult<(EntityId, EntityId)> {
    Ok((
        EntityId::parse(video_id, "video")?,
        EntityId::parse(playlist_id, "playlist")?,
    ))
}

async fn add_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let (video_id, playlist_id) = parse_pair(&video_id, &playlist_id)?;
    let playlist = state
        .playlist_service
        .add_video(playlist_id.as_str(), video_id.as_str(), &user.id)
        .await?;
    Ok(ApiResponse::ok(playlist).message("Video added to playlist"))
}

async fn remove_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let (video_id, playlist_id) = parse_pair(&video_id, &playlist_id)?;
    let playlist = state
        .playlist_service
        .remove_video(playlist_id.as_str(), video_id.as_str(), &user.id)
        .await?;
    Ok(ApiResponse::ok(playlist).message("Video removed from playlist"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/{user_id}", get(user_playlists))
        .route(
            "/{playlist_id}",
            get(get_playlist)
                .patch(update_playlist)
                .delete(delete_playlist),
        )
        .route("/add/{video_id}/{playlist_id}", patch(add_video))
        .route("/remove/{video_id}/{playlist_id}", patch(remove_video))
}
