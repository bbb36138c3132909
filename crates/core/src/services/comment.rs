//! Comment service.

use chrono::Utc;
use sea_orm::Set;
use vidhub_common::{AppError, AppResult, IdGenerator};
use vidhub_db::{
    entities::comment,
    repositories::{CommentRepository, LikeKind, LikeRepository, UserRepository, VideoRepository},
};

use crate::cascade::CascadeDeleter;
use crate::ownership::ensure_owner;
use crate::views::{self, CommentRow, CommentView, PageRequest, Paginated};

/// Service for managing comments.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    video_repo: VideoRepository,
    like_repo: LikeRepository,
    user_repo: UserRepository,
    cascade: CascadeDeleter,
    id_gen: IdGenerator,
}

fn content_of(content: &str) -> AppResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }
    Ok(content.to_string())
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        video_repo: VideoRepository,
        like_repo: LikeRepository,
        user_repo: UserRepository,
        cascade: CascadeDeleter,
    ) -> Self {
        Self {
            comment_repo,
            video_repo,
            like_repo,
            user_repo,
            cascade,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comments on a video, newest first.
    pub async fn list_for_video(
        &self,
        video_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<CommentView>> {
        if !self.video_repo.exists(video_id).await? {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let (comments, total) = tokio::try_join!(
            self.comment_repo
                .find_by_video(video_id, page.limit, page.offset()),
            self.comment_repo.count_by_video(video_id),
        )?;

        let comment_ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();
        let likes = self
            .like_repo
            .find_by_targets(LikeKind::Comment, &comment_ids)
            .await?;

        let mut user_ids: Vec<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        user_ids.extend(likes.iter().map(|l| l.user_id.clone()));
        user_ids.sort();
        user_ids.dedup();
        let users = views::user_index(&self.user_repo.find_by_ids(&user_ids).await?);

        Ok(Paginated::new(
            views::comment_views(&comments, &likes, &users),
            total,
            page,
        ))
    }

    /// Comment on a video.
    pub async fn add(&self, video_id: &str, actor_id: &str, content: &str) -> AppResult<CommentRow> {
        let content = content_of(content)?;
        if !self.video_repo.exists(video_id).await? {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            video_id: Set(video_id.to_string()),
            user_id: Set(actor_id.to_string()),
            content: Set(content),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let comment = self.comment_repo.create(model).await?;
        Ok(CommentRow::from(&comment))
    }

    /// Edit a comment's content.
    pub async fn update(
        &self,
        comment_id: &str,
        actor_id: &str,
        content: &str,
    ) -> AppResult<CommentRow> {
        let content = content_of(content)?;
        let comment = ensure_owner(self.comment_repo.find_by_id(comment_id).await?, actor_id)?;

        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(content);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.comment_repo.update(active).await?;
        Ok(CommentRow::from(&updated))
    }

    /// Delete a comment and its likes.
    pub async fn delete(&self, comment_id: &str, actor_id: &str) -> AppResult<()> {
        let comment = ensure_owner(self.comment_repo.find_by_id(comment_id).await?, actor_id)?;
        self.cascade.delete_comment(&comment).await
    }
}
