//! Video repository.

use std::sync::Arc;

use crate::entities::{Video, video};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Alias, Expr, Func, LikeExpr},
};
use vidhub_common::{AppError, AppResult};

/// Column a video listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortField {
    /// Upload time.
    #[default]
    CreatedAt,
    /// View counter.
    Views,
    /// Length in seconds.
    Duration,
    /// Title, lexicographic.
    Title,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

/// Filters for listing videos.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    /// Case-insensitive substring matched against title or description.
    pub query: Option<String>,
    /// Restrict to one owner.
    pub user_id: Option<String>,
    /// Hide unpublished videos.
    pub published_only: bool,
}

/// Escape LIKE wildcards so user input matches literally.
fn like_pattern(query: &str) -> LikeExpr {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// Video repository for database operations.
#[derive(Clone)]
pub struct VideoRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoRepository {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a video by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<video::Model>> {
        Video::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a video exists.
    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Find videos by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<video::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Video::find()
            .filter(video::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new video.
    pub async fn create(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a video.
    pub async fn update(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn filtered(filter: &VideoFilter) -> Select<Video> {
        let mut query = Video::find();

        if let Some(q) = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
        {
            let pattern = like_pattern(q);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(video::Column::Title)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(video::Column::Description)))
                            .like(pattern),
                    ),
            );
        }

        if let Some(user_id) = &filter.user_id {
            query = query.filter(video::Column::UserId.eq(user_id.as_str()));
        }

        if filter.published_only {
            query = query.filter(video::Column::IsPublished.eq(true));
        }

        query
    }

    /// List one page of videos matching a filter.
    pub async fn search(
        &self,
        filter: &VideoFilter,
        sort: VideoSortField,
        order: SortOrder,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<video::Model>> {
        let column = match sort {
            VideoSortField::CreatedAt => video::Column::CreatedAt,
            VideoSortField::Views => video::Column::Views,
            VideoSortField::Duration => video::Column::Duration,
            VideoSortField::Title => video::Column::Title,
        };

        let query = Self::filtered(filter);
        let query = match order {
            SortOrder::Asc => query.order_by_asc(column),
            SortOrder::Desc => query.order_by_desc(column),
        };

        query
            .order_by_desc(video::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count videos matching a filter.
    pub async fn count(&self, filter: &VideoFilter) -> AppResult<u64> {
        Self::filtered(filter)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All videos of a channel, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<video::Model>> {
        Video::find()
            .filter(video::Column::UserId.eq(user_id))
            .order_by_desc(video::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count videos of a channel.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Video::find()
            .filter(video::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sum of views across a channel's videos.
    pub async fn total_views_by_user(&self, user_id: &str) -> AppResult<i64> {
        #[derive(FromQueryResult)]
        struct SumResult {
            total: Option<i64>,
        }

        let result = Video::find()
            .filter(video::Column::UserId.eq(user_id))
            .select_only()
            // SUM(bigint) is numeric in Postgres
            .column_as(
                Expr::col(video::Column::Views).sum().cast_as(Alias::new("bigint")),
                "total",
            )
            .into_model::<SumResult>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.and_then(|r| r.total).unwrap_or(0))
    }

    /// Increment the view counter by one.
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        Video::update_many()
            .col_expr(video::Column::Views, Expr::col(video::Column::Views).add(1))
            .filter(video::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn create_test_video(id: &str, user_id: &str, title: &str) -> video::Model {
        video::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            video_url: format!("https://cdn.example.com/{id}.mp4"),
            thumbnail_url: format!("https://cdn.example.com/{id}.jpg"),
            duration: 12.5,
            views: 0,
            is_published: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_filter_matches_title_or_description_case_insensitively() {
        let filter = VideoFilter {
            query: Some("  Cats ".to_string()),
            user_id: Some("u1".to_string()),
            published_only: true,
        };
        let sql = VideoRepository::filtered(&filter)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("title") LIKE '%cats%'"#));
        assert!(sql.contains(r#"OR LOWER("description") LIKE '%cats%'"#));
        assert!(sql.contains(r#""user_id" = 'u1'"#));
        assert!(sql.contains(r#""is_published" = TRUE"#));
    }

    #[test]
    fn test_blank_query_adds_no_filter() {
        let filter = VideoFilter {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        let sql = VideoRepository::filtered(&filter)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"));
    }

    #[tokio::test]
    async fn test_search_returns_page() {
        let v1 = create_test_video("v1", "u1", "Rust in production");
        let v2 = create_test_video("v2", "u1", "Async rust");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[v1, v2]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let filter = VideoFilter {
            query: Some("RUST".to_string()),
            ..Default::default()
        };
        let result = repo
            .search(&filter, VideoSortField::CreatedAt, SortOrder::Desc, 10, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let count = repo.count(&VideoFilter::default()).await.unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_increment_views() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        assert!(repo.increment_views("v1").await.is_ok());
    }

    #[tokio::test]
    async fn test_total_views_by_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "total" => sea_orm::Value::BigInt(Some(42))
                }]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        assert_eq!(repo.total_views_by_user("u1").await.unwrap(), 42);
    }
}
