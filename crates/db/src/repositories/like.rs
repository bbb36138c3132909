//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like, video};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use vidhub_common::{AppError, AppResult};

/// Which target column a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeKind {
    /// `video_id` is set.
    Video,
    /// `comment_id` is set.
    Comment,
    /// `tweet_id` is set.
    Tweet,
}

impl LikeKind {
    /// Target column for this kind.
    #[must_use]
    pub const fn column(self) -> like::Column {
        match self {
            Self::Video => like::Column::VideoId,
            Self::Comment => like::Column::CommentId,
            Self::Tweet => like::Column::TweetId,
        }
    }

    /// Target id of a like of this kind.
    #[must_use]
    pub fn target_of(self, model: &like::Model) -> Option<&str> {
        match self {
            Self::Video => model.video_id.as_deref(),
            Self::Comment => model.comment_id.as_deref(),
            Self::Tweet => model.tweet_id.as_deref(),
        }
    }
}

/// Like repository for database operations.
///
/// Likes are created and removed through the toggle engine; this
/// repository only reads them.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Count likes on one target.
    pub async fn count_by_target(&self, kind: LikeKind, target_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(kind.column().eq(target_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All likes on any of the given targets, oldest first.
    pub async fn find_by_targets(
        &self,
        kind: LikeKind,
        target_ids: &[String],
    ) -> AppResult<Vec<like::Model>> {
        if target_ids.is_empty() {
            return Ok(vec![]);
        }

        Like::find()
            .filter(kind.column().is_in(target_ids.to_vec()))
            .order_by_asc(like::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Likes a user gave to targets of one kind, newest first.
    pub async fn find_by_user(&self, user_id: &str, kind: LikeKind) -> AppResult<Vec<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(kind.column().is_not_null())
            .order_by_desc(like::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes across every video of a channel.
    pub async fn count_for_channel_videos(&self, channel_id: &str) -> AppResult<u64> {
        Like::find()
            .join(JoinType::InnerJoin, like::Relation::Video.def())
            .filter(video::Column::UserId.eq(channel_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
