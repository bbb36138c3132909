//! Like service.

use vidhub_common::{AppError, AppResult, EntityId};
use vidhub_db::repositories::{
    CommentRepository, LikeKind, LikeRepository, TweetRepository, UserRepository, VideoRepository,
};

use crate::toggle::{LikeTarget, LikeToggle, ToggleEngine, ToggleOutcome};
use crate::views::{self, CommentRow, TweetRow, VideoView, WithOwner};

/// Service for liking videos, comments and tweets.
#[derive(Clone)]
pub struct LikeService {
    engine: ToggleEngine,
    like_repo: LikeRepository,
    video_repo: VideoRepository,
    comment_repo: CommentRepository,
    tweet_repo: TweetRepository,
    user_repo: UserRepository,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        engine: ToggleEngine,
        like_repo: LikeRepository,
        video_repo: VideoRepository,
        comment_repo: CommentRepository,
        tweet_repo: TweetRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            engine,
            like_repo,
            video_repo,
            comment_repo,
            tweet_repo,
            user_repo,
        }
    }

    /// Like or unlike a video.
    pub async fn toggle_video_like(
        &self,
        video_id: EntityId,
        actor_id: &str,
    ) -> AppResult<ToggleOutcome> {
        if !self.video_repo.exists(video_id.as_str()).await? {
            return Err(AppError::NotFound("Video not found".to_string()));
        }
        self.engine
            .toggle(&LikeToggle::new(actor_id, LikeTarget::video(video_id)))
            .await
    }

    /// Like or unlike a comment.
    pub async fn toggle_comment_like(
        &self,
        comment_id: EntityId,
        actor_id: &str,
    ) -> AppResult<ToggleOutcome> {
        if self
            .comment_repo
            .find_by_id(comment_id.as_str())
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }
        self.engine
            .toggle(&LikeToggle::new(actor_id, LikeTarget::comment(comment_id)))
            .await
    }

    /// Like or unlike a tweet.
    pub async fn toggle_tweet_like(
        &self,
        tweet_id: EntityId,
        actor_id: &str,
    ) -> AppResult<ToggleOutcome> {
        if self
            .tweet_repo
            .find_by_id(tweet_id.as_str())
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Tweet not found".to_string()));
        }
        self.engine
            .toggle(&LikeToggle::new(actor_id, LikeTarget::tweet(tweet_id)))
            .await
    }

    /// Ids the user liked, most recent first.
    async fn liked_ids(&self, user_id: &str, kind: LikeKind) -> AppResult<Vec<String>> {
        Ok(self
            .like_repo
            .find_by_user(user_id, kind)
            .await?
            .iter()
            .filter_map(|l| kind.target_of(l).map(str::to_string))
            .collect())
    }

    /// Videos the user liked. Unpublished videos of other users are left out.
    pub async fn liked_videos(&self, user_id: &str) -> AppResult<Vec<WithOwner<VideoView>>> {
        let ids = self.liked_ids(user_id, LikeKind::Video).await?;
        let videos: Vec<_> = self
            .video_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|v| v.is_published || v.user_id == user_id)
            .collect();

        let owner_ids: Vec<String> = videos.iter().map(|v| v.user_id.clone()).collect();
        let owners = views::user_index(&self.user_repo.find_by_ids(&owner_ids).await?);

        Ok(views::ordered_with_owner(
            &ids,
            &videos,
            |v| v.id.as_str(),
            |v| v.user_id.as_str(),
            &owners,
        ))
    }

    /// Comments the user liked.
    pub async fn liked_comments(&self, user_id: &str) -> AppResult<Vec<WithOwner<CommentRow>>> {
        let ids = self.liked_ids(user_id, LikeKind::Comment).await?;
        let comments = self.comment_repo.find_by_ids(&ids).await?;

        let owner_ids: Vec<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        let owners = views::user_index(&self.user_repo.find_by_ids(&owner_ids).await?);

        Ok(views::ordered_with_owner(
            &ids,
            &comments,
            |c| c.id.as_str(),
            |c| c.user_id.as_str(),
            &owners,
        ))
    }

    /// Tweets the user liked.
    pub async fn liked_tweets(&self, user_id: &str) -> AppResult<Vec<WithOwner<TweetRow>>> {
        let ids = self.liked_ids(user_id, LikeKind::Tweet).await?;
        let tweets = self.tweet_repo.find_by_ids(&ids).await?;

        let owner_ids: Vec<String> = tweets.iter().map(|t| t.user_id.clone()).collect();
        let owners = views::user_index(&self.user_repo.find_by_ids(&owner_ids).await?);

        Ok(views::ordered_with_owner(
            &ids,
            &tweets,
            |t| t.id.as_str(),
            |t| t.user_id.as_str(),
            &owners,
        ))
    }
}
