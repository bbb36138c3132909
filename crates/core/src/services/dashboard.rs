//! Channel dashboard.

use vidhub_common::AppResult;
use vidhub_db::repositories::{LikeRepository, SubscriptionRepository, VideoRepository};

use crate::views::{DashboardStats, VideoView};

/// Statistics and content listing for a channel owner.
#[derive(Clone)]
pub struct DashboardService {
    video_repo: VideoRepository,
    like_repo: LikeRepository,
    subscription_repo: SubscriptionRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        video_repo: VideoRepository,
        like_repo: LikeRepository,
        subscription_repo: SubscriptionRepository,
    ) -> Self {
        Self {
            video_repo,
            like_repo,
            subscription_repo,
        }
    }

    /// Views, subscribers, videos and likes of a channel.
    pub async fn stats(&self, channel_id: &str) -> AppResult<DashboardStats> {
        let (total_video_views, total_subscribers, total_videos, total_video_likes) = tokio::try_join!(
            self.video_repo.total_views_by_user(channel_id),
            self.subscription_repo.count_by_channel(channel_id),
            self.video_repo.count_by_user(channel_id),
            self.like_repo.count_for_channel_videos(channel_id),
        )?;

        Ok(DashboardStats {
            total_video_views,
            total_subscribers,
            total_videos,
            total_video_likes,
        })
    }

    /// Every video of the channel, published or not, newest first.
    pub async fn channel_videos(&self, channel_id: &str) -> AppResult<Vec<VideoView>> {
        Ok(self
            .video_repo
            .find_by_user(channel_id)
            .await?
            .iter()
            .map(VideoView::from)
            .collect())
    }
}
