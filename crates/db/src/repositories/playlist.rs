//! Playlist repository.

use std::sync::Arc;

use crate::entities::{Playlist, PlaylistVideo, playlist, playlist_video};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use vidhub_common::{AppError, AppResult};

/// Playlist repository for database operations.
#[derive(Clone)]
pub struct PlaylistRepository {
    db: Arc<DatabaseConnection>,
}

impl PlaylistRepository {
    /// Create a new playlist repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a playlist by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<playlist::Model>> {
        Playlist::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new playlist.
    pub async fn create(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a playlist.
    pub async fn update(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a playlist. Its entries go with it through the foreign key.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Playlist::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// All playlists of a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<playlist::Model>> {
        Playlist::find()
            .filter(playlist::Column::UserId.eq(user_id))
            .order_by_desc(playlist::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Entries of the given playlists in insertion order.
    pub async fn find_entries(
        &self,
        playlist_ids: &[String],
    ) -> AppResult<Vec<playlist_video::Model>> {
        if playlist_ids.is_empty() {
            return Ok(vec![]);
        }

        PlaylistVideo::find()
            .filter(playlist_video::Column::PlaylistId.is_in(playlist_ids.to_vec()))
            .order_by_asc(playlist_video::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add a video to a playlist. Returns `false` when it was already there.
    pub async fn add_video(&self, id: String, playlist_id: &str, video_id: &str) -> AppResult<bool> {
        let entry = playlist_video::ActiveModel {
            id: Set(id),
            playlist_id: Set(playlist_id.to_string()),
            video_id: Set(video_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = PlaylistVideo::insert(entry)
            .on_conflict(
                OnConflict::columns([
                    playlist_video::Column::PlaylistId,
                    playlist_video::Column::VideoId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Remove a video from a playlist. Returns `false` when it was not there.
    pub async fn remove_video(&self, playlist_id: &str, video_id: &str) -> AppResult<bool> {
        let result = PlaylistVideo::delete_many()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_video::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_entry(id: &str, playlist_id: &str, video_id: &str) -> playlist_video::Model {
        playlist_video::Model {
            id: id.to_string(),
            playlist_id: playlist_id.to_string(),
            video_id: video_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_add_video_duplicate_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        let added = repo.add_video("e1".to_string(), "p1", "v1").await.unwrap();

        assert!(!added);
    }

    #[tokio::test]
    async fn test_remove_video() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        assert!(repo.remove_video("p1", "v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_entries() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_entry("e1", "p1", "v1"),
                    create_test_entry("e2", "p1", "v2"),
                ]])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        let entries = repo.find_entries(&["p1".to_string()]).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].video_id, "v2");
    }
}
