//! Watch history repository.

use std::sync::Arc;

use crate::entities::{WatchHistory, watch_history};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use vidhub_common::{AppError, AppResult};

/// Watch history repository for database operations.
#[derive(Clone)]
pub struct WatchHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl WatchHistoryRepository {
    /// Create a new watch history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record that a user watched a video.
    ///
    /// Repeated views keep the first entry. Returns whether a row was added.
    pub async fn add(&self, id: String, user_id: &str, video_id: &str) -> AppResult<bool> {
        let entry = watch_history::ActiveModel {
            id: Set(id),
            user_id: Set(user_id.to_string()),
            video_id: Set(video_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = WatchHistory::insert(entry)
            .on_conflict(
                OnConflict::columns([
                    watch_history::Column::UserId,
                    watch_history::Column::VideoId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// A user's history, most recent first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<watch_history::Model>> {
        WatchHistory::find()
            .filter(watch_history::Column::UserId.eq(user_id))
            .order_by_desc(watch_history::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_add_first_view() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = WatchHistoryRepository::new(db);
        assert!(repo.add("h1".to_string(), "u1", "v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_repeated_view_keeps_set() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = WatchHistoryRepository::new(db);
        assert!(!repo.add("h2".to_string(), "u1", "v1").await.unwrap());
    }
}
