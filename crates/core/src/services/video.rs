//! Video service.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::{info, warn};
use vidhub_common::{AppError, AppResult, EntityId, IdGenerator, MediaKind, MediaStore};
use vidhub_db::{
    entities::video,
    repositories::{
        CommentRepository, LikeKind, LikeRepository, SortOrder, UserRepository, VideoFilter,
        VideoRepository, VideoSortField, WatchHistoryRepository,
    },
};

use crate::cascade::CascadeDeleter;
use crate::ownership::ensure_owner;
use crate::views::{self, PageRequest, Paginated, VideoDetails, VideoListItem, VideoView};

/// Query parameters for listing videos.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Substring matched against title and description.
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    /// Restrict to one channel.
    pub user_id: Option<String>,
}

impl VideoListQuery {
    /// Sort column; unknown names fall back to upload time.
    #[must_use]
    pub fn sort_field(&self) -> VideoSortField {
        match self.sort_by.as_deref() {
            Some("views") => VideoSortField::Views,
            Some("duration") => VideoSortField::Duration,
            Some("title") => VideoSortField::Title,
            _ => VideoSortField::CreatedAt,
        }
    }

    /// Sort direction; anything but `asc` is descending.
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        match self.sort_type.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Text fields of a new video.
#[derive(Debug, Clone, Default)]
pub struct PublishVideoInput {
    pub title: String,
    pub description: String,
}

/// Fields that may change on an existing video.
#[derive(Debug, Clone, Default)]
pub struct UpdateVideoInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// An uploaded asset not yet referenced by a stored row.
///
/// Dropping it unresolved, e.g. when the request future is cancelled,
/// removes the asset in a background task.
struct PendingMedia {
    media: Arc<dyn MediaStore>,
    url: Option<String>,
    kind: MediaKind,
}

impl PendingMedia {
    fn new(media: &Arc<dyn MediaStore>, url: &str, kind: MediaKind) -> Self {
        Self {
            media: Arc::clone(media),
            url: Some(url.to_string()),
            kind,
        }
    }

    /// The asset is now referenced; leave it alone.
    fn keep(mut self) {
        self.url = None;
    }

    /// Remove the asset now, best effort.
    async fn discard(mut self) {
        if let Some(url) = self.url.take() {
            remove_orphan(self.media.as_ref(), &url, self.kind).await;
        }
    }
}

impl Drop for PendingMedia {
    fn drop(&mut self) {
        let Some(url) = self.url.take() else {
            return;
        };
        let media = Arc::clone(&self.media);
        let kind = self.kind;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    remove_orphan(media.as_ref(), &url, kind).await;
                });
            }
            Err(_) => warn!(url = %url, "No runtime left to remove orphaned media"),
        }
    }
}

async fn remove_orphan(media: &dyn MediaStore, url: &str, kind: MediaKind) {
    if let Err(e) = media.delete(url, kind).await {
        warn!(url = %url, error = %e, "Failed to remove orphaned media");
    }
}

/// Service for managing videos.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
    comment_repo: CommentRepository,
    like_repo: LikeRepository,
    user_repo: UserRepository,
    history_repo: WatchHistoryRepository,
    media: Arc<dyn MediaStore>,
    cascade: CascadeDeleter,
    id_gen: IdGenerator,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub fn new(
        video_repo: VideoRepository,
        comment_repo: CommentRepository,
        like_repo: LikeRepository,
        user_repo: UserRepository,
        history_repo: WatchHistoryRepository,
        media: Arc<dyn MediaStore>,
        cascade: CascadeDeleter,
    ) -> Self {
        Self {
            video_repo,
            comment_repo,
            like_repo,
            user_repo,
            history_repo,
            media,
            cascade,
            id_gen: IdGenerator::new(),
        }
    }

    /// List videos.
    ///
    /// Unpublished videos only show up when a viewer lists their own channel.
    pub async fn list(
        &self,
        query: &VideoListQuery,
        viewer_id: Option<&str>,
    ) -> AppResult<Paginated<VideoListItem>> {
        let page = PageRequest::new(query.page, query.limit);
        let user_id = query
            .user_id
            .as_deref()
            .map(|raw| EntityId::parse(raw, "user"))
            .transpose()?;

        let own_channel = matches!((&user_id, viewer_id), (Some(u), Some(v)) if u.as_str() == v);
        let filter = VideoFilter {
            query: query.query.clone(),
            user_id: user_id.map(EntityId::into_inner),
            published_only: !own_channel,
        };

        let (videos, total) = tokio::try_join!(
            self.video_repo.search(
                &filter,
                query.sort_field(),
                query.sort_order(),
                page.limit,
                page.offset(),
            ),
            self.video_repo.count(&filter),
        )?;

        let video_ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();
        let likes = self
            .like_repo
            .find_by_targets(LikeKind::Video, &video_ids)
            .await?;

        let mut user_ids: Vec<String> = videos.iter().map(|v| v.user_id.clone()).collect();
        user_ids.extend(likes.iter().map(|l| l.user_id.clone()));
        user_ids.sort();
        user_ids.dedup();
        let users = views::user_index(&self.user_repo.find_by_ids(&user_ids).await?);

        Ok(Paginated::new(
            views::video_list(&videos, &likes, &users),
            total,
            page,
        ))
    }

    /// Get a video for display, counting the view.
    ///
    /// An unpublished video is only visible to its owner. Viewing bumps the
    /// view counter and records the video in the viewer's history.
    pub async fn get_for_viewer(
        &self,
        video_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<VideoDetails> {
        let video = self
            .video_repo
            .find_by_id(video_id)
            .await?
            .filter(|v| v.is_published || viewer_id == Some(v.user_id.as_str()))
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        self.video_repo.increment_views(&video.id).await?;
        if let Some(viewer_id) = viewer_id {
            self.history_repo
                .add(self.id_gen.generate(), viewer_id, &video.id)
                .await?;
        }

        let (number_of_likes, number_of_comments, owner) = tokio::try_join!(
            self.like_repo.count_by_target(LikeKind::Video, &video.id),
            self.comment_repo.count_by_video(&video.id),
            self.user_repo.find_by_id(&video.user_id),
        )?;

        let mut details =
            views::video_details(&video, owner.as_ref(), number_of_likes, number_of_comments);
        details.video.views += 1;
        Ok(details)
    }

    /// Upload a video with its thumbnail and store it.
    pub async fn publish(
        &self,
        owner_id: &str,
        input: PublishVideoInput,
        video_file: &Path,
        thumbnail_file: &Path,
    ) -> AppResult<VideoView> {
        let title = input.title.trim();
        let description = input.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(AppError::BadRequest(
                "Title and description are required".to_string(),
            ));
        }

        let uploaded_video = self.media.upload(video_file, MediaKind::Video).await?;
        let video_asset = PendingMedia::new(&self.media, &uploaded_video.url, MediaKind::Video);

        let uploaded_thumbnail = match self.media.upload(thumbnail_file, MediaKind::Image).await {
            Ok(t) => t,
            Err(e) => {
                video_asset.discard().await;
                return Err(e);
            }
        };
        let thumbnail_asset =
            PendingMedia::new(&self.media, &uploaded_thumbnail.url, MediaKind::Image);

        let model = video::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner_id.to_string()),
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            video_url: Set(uploaded_video.url.clone()),
            thumbnail_url: Set(uploaded_thumbnail.url.clone()),
            duration: Set(uploaded_video.duration.unwrap_or_default()),
            views: Set(0),
            is_published: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let video = match self.video_repo.create(model).await {
            Ok(v) => v,
            Err(e) => {
                video_asset.discard().await;
                thumbnail_asset.discard().await;
                return Err(e);
            }
        };
        video_asset.keep();
        thumbnail_asset.keep();

        info!(video_id = %video.id, owner = %owner_id, "Published video");
        Ok(VideoView::from(&video))
    }

    /// Update title, description and/or thumbnail.
    ///
    /// A replaced thumbnail is removed from the media host afterwards.
    pub async fn update(
        &self,
        video_id: &str,
        actor_id: &str,
        input: UpdateVideoInput,
        thumbnail_file: Option<&Path>,
    ) -> AppResult<VideoView> {
        let video = ensure_owner(self.video_repo.find_by_id(video_id).await?, actor_id)?;

        if input.title.is_none() && input.description.is_none() && thumbnail_file.is_none() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }
        let title = non_blank(input.title, "Title")?;
        let description = non_blank(input.description, "Description")?;

        let new_thumbnail = match thumbnail_file {
            Some(path) => Some(self.media.upload(path, MediaKind::Image).await?),
            None => None,
        };
        let pending_thumbnail = new_thumbnail
            .as_ref()
            .map(|t| PendingMedia::new(&self.media, &t.url, MediaKind::Image));

        let old_thumbnail = video.thumbnail_url.clone();
        let mut active: video::ActiveModel = video.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        if let Some(thumbnail) = &new_thumbnail {
            active.thumbnail_url = Set(thumbnail.url.clone());
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = match self.video_repo.update(active).await {
            Ok(v) => v,
            Err(e) => {
                if let Some(pending) = pending_thumbnail {
                    pending.discard().await;
                }
                return Err(e);
            }
        };

        if let Some(pending) = pending_thumbnail {
            pending.keep();
            remove_orphan(self.media.as_ref(), &old_thumbnail, MediaKind::Image).await;
        }

        Ok(VideoView::from(&updated))
    }

    /// Delete a video and everything hanging off it.
    pub async fn delete(&self, video_id: &str, actor_id: &str) -> AppResult<()> {
        let video = ensure_owner(self.video_repo.find_by_id(video_id).await?, actor_id)?;
        self.cascade.delete_video(&video).await
    }

    /// Flip the published flag.
    pub async fn toggle_publish(&self, video_id: &str, actor_id: &str) -> AppResult<VideoView> {
        let video = ensure_owner(self.video_repo.find_by_id(video_id).await?, actor_id)?;

        let published = !video.is_published;
        let mut active: video::ActiveModel = video.into();
        active.is_published = Set(published);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.video_repo.update(active).await?;
        info!(video_id = %updated.id, published, "Toggled publish status");
        Ok(VideoView::from(&updated))
    }
}

fn non_blank(value: Option<String>, field: &str) -> AppResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::BadRequest(format!("{field} cannot be empty")))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{RecordingMediaStore, test_user, test_video};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    fn empty_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn count(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    struct Dbs {
        video: DatabaseConnection,
        comment: DatabaseConnection,
        like: DatabaseConnection,
        user: DatabaseConnection,
        history: DatabaseConnection,
        cascade: DatabaseConnection,
    }

    impl Default for Dbs {
        fn default() -> Self {
            Self {
                video: empty_db(),
                comment: empty_db(),
                like: empty_db(),
                user: empty_db(),
                history: empty_db(),
                cascade: empty_db(),
            }
        }
    }

    fn create_test_service(dbs: Dbs, media: Arc<RecordingMediaStore>) -> VideoService {
        VideoService::new(
            VideoRepository::new(Arc::new(dbs.video)),
            CommentRepository::new(Arc::new(dbs.comment)),
            LikeRepository::new(Arc::new(dbs.like)),
            UserRepository::new(Arc::new(dbs.user)),
            WatchHistoryRepository::new(Arc::new(dbs.history)),
            media.clone(),
            CascadeDeleter::new(Arc::new(dbs.cascade), media),
        )
    }

    #[test]
    fn test_sort_parsing() {
        let query = VideoListQuery {
            sort_by: Some("views".to_string()),
            sort_type: Some("ASC".to_string()),
            ..Default::default()
        };
        assert_eq!(query.sort_field(), VideoSortField::Views);
        assert_eq!(query.sort_order(), SortOrder::Asc);

        let query = VideoListQuery {
            sort_by: Some("bogus".to_string()),
            ..Default::default()
        };
        assert_eq!(query.sort_field(), VideoSortField::CreatedAt);
        assert_eq!(query.sort_order(), SortOrder::Desc);
    }

    #[tokio::test]
    async fn test_list_empty_result_is_empty_page() {
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .append_query_results([[count(0)]])
                .into_connection(),
            ..Default::default()
        };
        let service = create_test_service(dbs, Arc::new(RecordingMediaStore::default()));

        let query = VideoListQuery {
            query: Some("nothing matches".to_string()),
            ..Default::default()
        };
        let page = service.list(&query, None).await.unwrap();

        assert!(page.docs.is_empty());
        assert_eq!(page.total_docs, 0);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_user_id() {
        let service = create_test_service(Dbs::default(), Arc::new(RecordingMediaStore::default()));
        let query = VideoListQuery {
            user_id: Some("xyz".to_string()),
            ..Default::default()
        };

        let err = service.list(&query, None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Invalid user id"));
    }

    #[tokio::test]
    async fn test_get_unpublished_hidden_from_others() {
        let mut video = test_video("v1", "u1");
        video.is_published = false;
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                .into_connection(),
            ..Default::default()
        };
        let service = create_test_service(dbs, Arc::new(RecordingMediaStore::default()));

        let err = service.get_for_viewer("v1", Some("u2")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_counts_view_and_history() {
        let video = test_video("v1", "u1");
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                .append_exec_results([exec(1)])
                .into_connection(),
            history: MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .into_connection(),
            like: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count(4)]])
                .into_connection(),
            comment: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count(2)]])
                .into_connection(),
            user: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("u1", "alice")]])
                .into_connection(),
            ..Default::default()
        };
        let service = create_test_service(dbs, Arc::new(RecordingMediaStore::default()));

        let details = service.get_for_viewer("v1", Some("u2")).await.unwrap();

        assert_eq!(details.video.views, 11);
        assert_eq!(details.number_of_likes, 4);
        assert_eq!(details.number_of_comments, 2);
        assert_eq!(details.owner.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_publish_requires_text_before_upload() {
        let media = Arc::new(RecordingMediaStore::default());
        let service = create_test_service(Dbs::default(), media.clone());

        let err = service
            .publish(
                "u1",
                PublishVideoInput {
                    title: " ".to_string(),
                    description: "d".to_string(),
                },
                Path::new("/tmp/v.mp4"),
                Path::new("/tmp/t.jpg"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(media.uploaded().is_empty());
    }

    #[tokio::test]
    async fn test_publish_uploads_both_files() {
        let created = test_video("v1", "u1");
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .into_connection(),
            ..Default::default()
        };
        let media = Arc::new(RecordingMediaStore::default());
        let service = create_test_service(dbs, media.clone());

        let view = service
            .publish(
                "u1",
                PublishVideoInput {
                    title: "Title".to_string(),
                    description: "Description".to_string(),
                },
                Path::new("/tmp/v.mp4"),
                Path::new("/tmp/t.jpg"),
            )
            .await
            .unwrap();

        assert_eq!(view.id, "v1");
        assert_eq!(
            media.uploaded(),
            vec![
                ("v.mp4".to_string(), MediaKind::Video),
                ("t.jpg".to_string(), MediaKind::Image)
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_thumbnail_failure_removes_video_asset() {
        let media = Arc::new(RecordingMediaStore::failing_uploads_of(MediaKind::Image));
        let service = create_test_service(Dbs::default(), media.clone());

        let err = service
            .publish(
                "u1",
                PublishVideoInput {
                    title: "Title".to_string(),
                    description: "Description".to_string(),
                },
                Path::new("/tmp/v.mp4"),
                Path::new("/tmp/t.jpg"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ExternalService(_)));
        assert_eq!(media.deleted(), vec!["https://media.test/video/v.mp4"]);
    }

    #[tokio::test]
    async fn test_cancelled_publish_removes_uploaded_video() {
        let media = Arc::new(RecordingMediaStore::stalling_uploads_of(MediaKind::Image));
        let service = create_test_service(Dbs::default(), media.clone());

        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            service.publish(
                "u1",
                PublishVideoInput {
                    title: "Title".to_string(),
                    description: "Description".to_string(),
                },
                Path::new("/tmp/v.mp4"),
                Path::new("/tmp/t.jpg"),
            ),
        )
        .await;
        assert!(outcome.is_err());

        for _ in 0..10 {
            if !media.deleted().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(media.deleted(), vec!["https://media.test/video/v.mp4"]);
    }

    #[tokio::test]
    async fn test_publish_store_failure_removes_both_assets() {
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([sea_orm::DbErr::Custom("insert failed".to_string())])
                .into_connection(),
            ..Default::default()
        };
        let media = Arc::new(RecordingMediaStore::default());
        let service = create_test_service(dbs, media.clone());

        let err = service
            .publish(
                "u1",
                PublishVideoInput {
                    title: "Title".to_string(),
                    description: "Description".to_string(),
                },
                Path::new("/tmp/v.mp4"),
                Path::new("/tmp/t.jpg"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(
            media.deleted(),
            vec![
                "https://media.test/video/v.mp4",
                "https://media.test/image/t.jpg"
            ]
        );
    }

    #[tokio::test]
    async fn test_update_by_non_owner_forbidden() {
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_video("v1", "u1")]])
                .into_connection(),
            ..Default::default()
        };
        let service = create_test_service(dbs, Arc::new(RecordingMediaStore::default()));

        let err = service
            .update(
                "v1",
                "u2",
                UpdateVideoInput {
                    title: Some("mine now".to_string()),
                    description: None,
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_thumbnail_replaces_old_asset() {
        let video = test_video("v1", "u1");
        let mut updated = video.clone();
        updated.thumbnail_url = "https://media.test/image/new.jpg".to_string();
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video.clone()]])
                .append_query_results([[updated]])
                .into_connection(),
            ..Default::default()
        };
        let media = Arc::new(RecordingMediaStore::default());
        let service = create_test_service(dbs, media.clone());

        let view = service
            .update(
                "v1",
                "u1",
                UpdateVideoInput::default(),
                Some(Path::new("/tmp/new.jpg")),
            )
            .await
            .unwrap();

        assert_eq!(view.thumbnail_url, "https://media.test/image/new.jpg");
        assert_eq!(media.deleted(), vec![video.thumbnail_url]);
    }

    #[tokio::test]
    async fn test_update_nothing_is_bad_request() {
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_video("v1", "u1")]])
                .into_connection(),
            ..Default::default()
        };
        let service = create_test_service(dbs, Arc::new(RecordingMediaStore::default()));

        let err = service
            .update("v1", "u1", UpdateVideoInput::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_forbidden_and_untouched() {
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_video("v1", "u1")]])
                .into_connection(),
            ..Default::default()
        };
        let media = Arc::new(RecordingMediaStore::default());
        let service = create_test_service(dbs, media.clone());

        let err = service.delete("v1", "u2").await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(media.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_video_not_found() {
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
            ..Default::default()
        };
        let service = create_test_service(dbs, Arc::new(RecordingMediaStore::default()));

        let err = service.delete("v1", "u1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Video not found"));
    }

    #[tokio::test]
    async fn test_toggle_publish() {
        let video = test_video("v1", "u1");
        let mut flipped = video.clone();
        flipped.is_published = false;
        let dbs = Dbs {
            video: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                .append_query_results([[flipped]])
                .into_connection(),
            ..Default::default()
        };
        let service = create_test_service(dbs, Arc::new(RecordingMediaStore::default()));

        let view = service.toggle_publish("v1", "u1").await.unwrap();
        assert!(!view.is_published);
    }
}
