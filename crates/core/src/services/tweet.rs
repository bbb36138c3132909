//! Tweet service.

use chrono::Utc;
use sea_orm::Set;
use vidhub_common::{AppError, AppResult, IdGenerator};
use vidhub_db::{
    entities::tweet,
    repositories::{LikeKind, LikeRepository, TweetRepository, UserRepository},
};

use crate::cascade::CascadeDeleter;
use crate::ownership::ensure_owner;
use crate::views::{self, PageRequest, Paginated, TweetRow, TweetView};

/// Service for managing tweets.
#[derive(Clone)]
pub struct TweetService {
    tweet_repo: TweetRepository,
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

impl TweetService {
    /// Create a new tweet service.
    #[must_use]
    pub const fn new(
        tweet_repo: TweetRepository,
        like_repo: LikeRepository,
        user_repo: UserRepository,
        cascade: CascadeDeleter,
    ) -> Self {
        Self {
            tweet_repo,
            like_repo,
            user_repo,
            cascade,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a tweet.
    pub async fn create(&self, actor_id: &str, content: &str) -> AppResult<TweetRow> {
        let model = tweet::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor_id.to_string()),
            content: Set(content_of(content)?),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let tweet = self.tweet_repo.create(model).await?;
        Ok(TweetRow::from(&tweet))
    }

    /// All tweets of a user, newest first.
    pub async fn list_user_tweets(&self, user_id: &str) -> AppResult<Vec<TweetView>> {
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let tweets = self.tweet_repo.find_by_user(user_id).await?;
        self.compose(&tweets).await
    }

    /// All tweets, newest first.
    pub async fn list_all(&self, page: PageRequest) -> AppResult<Paginated<TweetView>> {
        let (tweets, total) = tokio::try_join!(
            self.tweet_repo.find_page(page.limit, page.offset()),
            self.tweet_repo.count(),
        )?;

        Ok(Paginated::new(self.compose(&tweets).await?, total, page))
    }

    async fn compose(&self, tweets: &[tweet::Model]) -> AppResult<Vec<TweetView>> {
        let tweet_ids: Vec<String> = tweets.iter().map(|t| t.id.clone()).collect();
        let likes = self
            .like_repo
            .find_by_targets(LikeKind::Tweet, &tweet_ids)
            .await?;

        let mut user_ids: Vec<String> = tweets.iter().map(|t| t.user_id.clone()).collect();
        user_ids.extend(likes.iter().map(|l| l.user_id.clone()));
        user_ids.sort();
        user_ids.dedup();
        let users = views::user_index(&self.user_repo.find_by_ids(&user_ids).await?);

        Ok(views::tweet_views(tweets, &likes, &users))
    }

    /// Edit a tweet's content.
    pub async fn update(&self, tweet_id: &str, actor_id: &str, content: &str) -> AppResult<TweetRow> {
        let content = content_of(content)?;
        let tweet = ensure_owner(self.tweet_repo.find_by_id(tweet_id).await?, actor_id)?;

        let mut active: tweet::ActiveModel = tweet.into();
        active.content = Set(content);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.tweet_repo.update(active).await?;
        Ok(TweetRow::from(&updated))
    }

    /// Delete a tweet and its likes.
    pub async fn delete(&self, tweet_id: &str, actor_id: &str) -> AppResult<()> {
        let tweet = ensure_owner(self.tweet_repo.find_by_id(tweet_id).await?, actor_id)?;
        self.cascade.delete_tweet(&tweet).await
    }
}
