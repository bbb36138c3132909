//! Cascading deletes for videos, comments and tweets.
//!
//! Dependents go first and the entity itself last, all inside one
//! transaction. Any failure rolls everything back and is reported as an
//! operation-level `Internal` error; the cause only reaches the log.

use std::sync::Arc;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{error, info};
use vidhub_common::{AppError, AppResult, MediaKind, MediaStore};
use vidhub_db::entities::{
    Comment, Like, PlaylistVideo, Tweet, Video, WatchHistory, comment, like, playlist_video,
    tweet, video, watch_history,
};

/// Deletes an entity together with everything that only exists because of it.
#[derive(Clone)]
pub struct CascadeDeleter {
    db: Arc<DatabaseConnection>,
    media: Arc<dyn MediaStore>,
}

fn db_err(e: sea_orm::DbErr) -> AppError {
    AppError::Database(e.to_string())
}

impl CascadeDeleter {
    /// Create a new cascade deleter.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, media: Arc<dyn MediaStore>) -> Self {
        Self { db, media }
    }

    /// Delete a video, its likes, its comments and their likes, its playlist
    /// entries, its watch-history entries and its media assets.
    pub async fn delete_video(&self, video: &video::Model) -> AppResult<()> {
        let result = async {
            let txn = self.db.begin().await.map_err(db_err)?;
            self.remove_video_dependents(&txn, video).await?;

            self.media.delete(&video.video_url, MediaKind::Video).await?;
            self.media
                .delete(&video.thumbnail_url, MediaKind::Image)
                .await?;

            Video::delete_by_id(video.id.as_str())
                .exec(&txn)
                .await
                .map_err(db_err)?;

            txn.commit().await.map_err(db_err)
        }
        .await;

        finish(result, "video", &video.id)
    }

    async fn remove_video_dependents(
        &self,
        txn: &DatabaseTransaction,
        video: &video::Model,
    ) -> AppResult<()> {
        Like::delete_many()
            .filter(like::Column::VideoId.eq(video.id.as_str()))
            .exec(txn)
            .await
            .map_err(db_err)?;

        let comment_ids: Vec<String> = Comment::find()
            .filter(comment::Column::VideoId.eq(video.id.as_str()))
            .all(txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|c| c.id)
            .collect();

        if !comment_ids.is_empty() {
            Like::delete_many()
                .filter(like::Column::CommentId.is_in(comment_ids))
                .exec(txn)
                .await
                .map_err(db_err)?;

            Comment::delete_many()
                .filter(comment::Column::VideoId.eq(video.id.as_str()))
                .exec(txn)
                .await
                .map_err(db_err)?;
        }

        PlaylistVideo::delete_many()
            .filter(playlist_video::Column::VideoId.eq(video.id.as_str()))
            .exec(txn)
            .await
            .map_err(db_err)?;

        WatchHistory::delete_many()
            .filter(watch_history::Column::VideoId.eq(video.id.as_str()))
            .exec(txn)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    /// Delete a comment and its likes.
    pub async fn delete_comment(&self, comment: &comment::Model) -> AppResult<()> {
        let result = async {
            let txn = self.db.begin().await.map_err(db_err)?;

            Like::delete_many()
                .filter(like::Column::CommentId.eq(comment.id.as_str()))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            Comment::delete_by_id(comment.id.as_str())
                .exec(&txn)
                .await
                .map_err(db_err)?;

            txn.commit().await.map_err(db_err)
        }
        .await;

        finish(result, "comment", &comment.id)
    }

    /// Delete a tweet and its likes.
    pub async fn delete_tweet(&self, tweet: &tweet::Model) -> AppResult<()> {
        let result = async {
            let txn = self.db.begin().await.map_err(db_err)?;

            Like::delete_many()
                .filter(like::Column::TweetId.eq(tweet.id.as_str()))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            Tweet::delete_by_id(tweet.id.as_str())
                .exec(&txn)
                .await
                .map_err(db_err)?;

            txn.commit().await.map_err(db_err)
        }
        .await;

        finish(result, "tweet", &tweet.id)
    }
}

fn finish(result: AppResult<()>, kind: &str, id: &str) -> AppResult<()> {
    match result {
        Ok(()) => {
            info!(kind = kind, id = %id, "Deleted with dependents");
            Ok(())
        }
        Err(e) => {
            error!(kind = kind, id = %id, error = %e, "Cascade delete failed");
            Err(AppError::Internal(format!("Error while deleting {kind}")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{RecordingMediaStore, test_comment, test_tweet, test_video};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    #[tokio::test]
    async fn test_delete_video_removes_dependents_then_video() {
        let video = test_video("v1", "u1");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // likes on the video
                .append_exec_results([exec(3)])
                .append_query_results([[
                    test_comment("c1", "v1", "u2"),
                    test_comment("c2", "v1", "u3"),
                ]])
                // likes on comments, comments, playlist entries, history, video
                .append_exec_results([exec(2), exec(2), exec(1), exec(4), exec(1)])
                .into_connection(),
        );
        let media = Arc::new(RecordingMediaStore::default());

        let deleter = CascadeDeleter::new(Arc::clone(&db), media.clone());
        deleter.delete_video(&video).await.unwrap();
        drop(deleter);

        assert_eq!(
            media.deleted(),
            vec![video.video_url.clone(), video.thumbnail_url.clone()]
        );

        let Ok(conn) = Arc::try_unwrap(db) else {
            panic!("connection still shared");
        };
        let log = statement_log(conn);
        assert_in_order(
            &log,
            &[
                "DELETE FROM like WHERE like.video_id = $1",
                "FROM comment WHERE comment.video_id = $1",
                "DELETE FROM like WHERE like.comment_id IN ($1, $2)",
                "DELETE FROM comment WHERE comment.video_id = $1",
                "DELETE FROM playlist_video WHERE playlist_video.video_id = $1",
                "DELETE FROM watch_history WHERE watch_history.video_id = $1",
                "DELETE FROM video WHERE video.id = $1",
            ],
        );
        assert!(log.contains(r#"String(Some("v1"))"#));
    }

    /// Every logged statement as one string, identifier quotes stripped.
    fn statement_log(conn: sea_orm::DatabaseConnection) -> String {
        format!("{:?}", conn.into_transaction_log()).replace("\\\"", "")
    }

    fn assert_in_order(log: &str, fragments: &[&str]) {
        let mut from = 0;
        for fragment in fragments {
            let found = log[from..]
                .find(fragment)
                .unwrap_or_else(|| panic!("missing or out of order: {fragment}\n{log}"));
            from += found + fragment.len();
        }
    }

    #[tokio::test]
    async fn test_delete_video_media_failure_is_internal() {
        let video = test_video("v1", "u1");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0)])
                .append_query_results([Vec::<comment::Model>::new()])
                .append_exec_results([exec(0), exec(0)])
                .into_connection(),
        );
        let media = Arc::new(RecordingMediaStore::failing());

        let deleter = CascadeDeleter::new(db, media);
        let err = deleter.delete_video(&video).await.unwrap_err();

        assert!(matches!(err, AppError::Internal(ref m) if m == "Error while deleting video"));
    }

    #[tokio::test]
    async fn test_delete_comment() {
        let comment = test_comment("c1", "v1", "u1");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(2), exec(1)])
                .into_connection(),
        );

        let deleter = CascadeDeleter::new(db, Arc::new(RecordingMediaStore::default()));
        assert!(deleter.delete_comment(&comment).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_tweet_store_failure_is_internal() {
        let tweet = test_tweet("t1", "u1");
        // No exec results queued: the first statement fails
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let deleter = CascadeDeleter::new(db, Arc::new(RecordingMediaStore::default()));
        let err = deleter.delete_tweet(&tweet).await.unwrap_err();

        assert!(matches!(err, AppError::Internal(ref m) if m == "Error while deleting tweet"));
    }
}
