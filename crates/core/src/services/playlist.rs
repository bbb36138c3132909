//! Playlist service.

use chrono::Utc;
use sea_orm::Set;
use tracing::debug;
use vidhub_common::{AppError, AppResult, IdGenerator};
use vidhub_db::{
    entities::{playlist, video},
    repositories::{PlaylistRepository, UserRepository, VideoRepository},
};

use crate::ownership::ensure_owner;
use crate::views::{self, PlaylistView};

/// Service for managing playlists.
#[derive(Clone)]
pub struct PlaylistService {
    playlist_repo: PlaylistRepository,
    video_repo: VideoRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl PlaylistService {
    /// Create a new playlist service.
    #[must_use]
    pub const fn new(
        playlist_repo: PlaylistRepository,
        video_repo: VideoRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            playlist_repo,
            video_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an empty playlist.
    pub async fn create(
        &self,
        owner_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<PlaylistView> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Playlist name is required".to_string()));
        }

        let model = playlist::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner_id.to_string()),
            name: Set(name.to_string()),
            description: Set(description.unwrap_or_default().trim().to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let playlist = self.playlist_repo.create(model).await?;
        self.single_view(playlist).await
    }

    /// Playlists of a user, with their videos.
    pub async fn user_playlists(&self, user_id: &str) -> AppResult<Vec<PlaylistView>> {
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let playlists = self.playlist_repo.find_by_user(user_id).await?;
        self.compose(&playlists).await
    }

    /// A playlist with its videos.
    pub async fn get_by_id(&self, playlist_id: &str) -> AppResult<PlaylistView> {
        let playlist = self
            .playlist_repo
            .find_by_id(playlist_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
        self.single_view(playlist).await
    }

    /// Add a video. Adding a video already in the playlist changes nothing.
    pub async fn add_video(
        &self,
        playlist_id: &str,
        video_id: &str,
        actor_id: &str,
    ) -> AppResult<PlaylistView> {
        let playlist = ensure_owner(self.playlist_repo.find_by_id(playlist_id).await?, actor_id)?;
        if !self.video_repo.exists(video_id).await? {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let added = self
            .playlist_repo
            .add_video(self.id_gen.generate(), &playlist.id, video_id)
            .await?;
        debug!(playlist_id = %playlist.id, video_id = %video_id, added, "Add to playlist");

        self.single_view(playlist).await
    }

    /// Remove a video.
    pub async fn remove_video(
        &self,
        playlist_id: &str,
        video_id: &str,
        actor_id: &str,
    ) -> AppResult<PlaylistView> {
        let playlist = ensure_owner(self.playlist_repo.find_by_id(playlist_id).await?, actor_id)?;

        if !self.playlist_repo.remove_video(&playlist.id, video_id).await? {
            return Err(AppError::NotFound(
                "Video is not in this playlist".to_string(),
            ));
        }

        self.single_view(playlist).await
    }

    /// Rename or re-describe a playlist.
    pub async fn update(
        &self,
        playlist_id: &str,
        actor_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<PlaylistView> {
        let playlist = ensure_owner(self.playlist_repo.find_by_id(playlist_id).await?, actor_id)?;

        if name.is_none() && description.is_none() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        let mut active: playlist::ActiveModel = playlist.into();
        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::BadRequest("Playlist name is required".to_string()));
            }
            active.name = Set(name.to_string());
        }
        if let Some(description) = description {
            active.description = Set(description.trim().to_string());
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.playlist_repo.update(active).await?;
        self.single_view(updated).await
    }

    /// Delete a playlist. The videos themselves stay.
    pub async fn delete(&self, playlist_id: &str, actor_id: &str) -> AppResult<()> {
        let playlist = ensure_owner(self.playlist_repo.find_by_id(playlist_id).await?, actor_id)?;
        self.playlist_repo.delete(&playlist.id).await?;
        Ok(())
    }

    async fn single_view(&self, playlist: playlist::Model) -> AppResult<PlaylistView> {
        self.compose(std::slice::from_ref(&playlist))
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))
    }

    async fn compose(&self, playlists: &[playlist::Model]) -> AppResult<Vec<PlaylistView>> {
        let ids: Vec<String> = playlists.iter().map(|p| p.id.clone()).collect();
        let entries = self.playlist_repo.find_entries(&ids).await?;

        let video_ids: Vec<String> = entries.iter().map(|e| e.video_id.clone()).collect();
        let videos: Vec<video::Model> = self.video_repo.find_by_ids(&video_ids).await?;

        Ok(views::playlist_views(playlists, &entries, &videos))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{test_playlist, test_video};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use vidhub_db::entities::playlist_video;

    fn empty_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    fn entry(id: &str, playlist_id: &str, video_id: &str) -> playlist_video::Model {
        playlist_video::Model {
            id: id.to_string(),
            playlist_id: playlist_id.to_string(),
            video_id: video_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_service(
        playlist_db: DatabaseConnection,
        video_db: DatabaseConnection,
    ) -> PlaylistService {
        PlaylistService::new(
            PlaylistRepository::new(Arc::new(playlist_db)),
            VideoRepository::new(Arc::new(video_db)),
            UserRepository::new(Arc::new(empty_db())),
        )
    }

    #[tokio::test]
    async fn test_create_blank_name() {
        let service = create_test_service(empty_db(), empty_db());

        let err = service.create("u1", "  ", None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_add_video_by_non_owner_forbidden() {
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            .into_connection();
        let service = create_test_service(playlist_db, empty_db());

        let err = service.add_video("p1", "v1", "u2").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_add_missing_video() {
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            .into_connection();
        let video_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<video::Model>::new()])
            .into_connection();
        let service = create_test_service(playlist_db, video_db);

        let err = service.add_video("p1", "v1", "u1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Video not found"));
    }

    #[tokio::test]
    async fn test_add_video_twice_keeps_one_entry() {
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            // duplicate insert is a no-op
            .append_exec_results([exec(0)])
            .append_query_results([[entry("e1", "p1", "v1")]])
            .into_connection();
        let video_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_video("v1", "u2")]])
            .append_query_results([[test_video("v1", "u2")]])
            .into_connection();
        let service = create_test_service(playlist_db, video_db);

        let view = service.add_video("p1", "v1", "u1").await.unwrap();

        assert_eq!(view.total_videos, 1);
        assert_eq!(view.videos[0].id, "v1");
    }

    #[tokio::test]
    async fn test_remove_absent_video() {
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            .append_exec_results([exec(0)])
            .into_connection();
        let service = create_test_service(playlist_db, empty_db());

        let err = service.remove_video("p1", "v1", "u1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            .append_exec_results([exec(1)])
            .into_connection();
        let service = create_test_service(playlist_db, empty_db());

        assert!(service.delete("p1", "u1").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_nothing() {
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            .into_connection();
        let service = create_test_service(playlist_db, empty_db());

        let err = service.update("p1", "u1", None, None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
