//! Toggle engine for like and subscription relations.
//!
//! A toggle removes the (actor, target) relation when it exists and creates
//! it otherwise. Both steps run in one transaction, and the unique indexes on
//! the relation tables reject a duplicate created by a concurrent toggle.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryFilter,
    Set, SqlErr, TransactionTrait, prelude::DateTimeWithTimeZone,
};
use serde::Serialize;
use vidhub_common::{AppError, AppResult, EntityId, IdGenerator};
use vidhub_db::entities::{like, subscription};
use vidhub_db::repositories::LikeKind;

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    /// The relation did not exist and was created.
    Added,
    /// The relation existed and was deleted.
    Removed,
}

/// A relation keyed by (actor, target).
pub trait ToggleRelation {
    /// Table holding the relation.
    type Entity: EntityTrait;

    /// Condition matching the relation row(s) for this pair.
    fn key(&self) -> Condition;

    /// New relation row.
    fn record(
        &self,
        id: String,
        now: DateTimeWithTimeZone,
    ) -> <Self::Entity as EntityTrait>::ActiveModel;
}

/// What a like points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeTarget {
    /// Target kind.
    pub kind: LikeKind,
    /// Target id.
    pub id: EntityId,
}

impl LikeTarget {
    /// A video.
    #[must_use]
    pub const fn video(id: EntityId) -> Self {
        Self {
            kind: LikeKind::Video,
            id,
        }
    }

    /// A comment.
    #[must_use]
    pub const fn comment(id: EntityId) -> Self {
        Self {
            kind: LikeKind::Comment,
            id,
        }
    }

    /// A tweet.
    #[must_use]
    pub const fn tweet(id: EntityId) -> Self {
        Self {
            kind: LikeKind::Tweet,
            id,
        }
    }
}

/// Like or unlike.
#[derive(Debug, Clone)]
pub struct LikeToggle {
    actor: String,
    target: LikeTarget,
}

impl LikeToggle {
    /// Toggle `actor`'s like on `target`.
    #[must_use]
    pub fn new(actor: &str, target: LikeTarget) -> Self {
        Self {
            actor: actor.to_string(),
            target,
        }
    }
}

impl ToggleRelation for LikeToggle {
    type Entity = like::Entity;

    fn key(&self) -> Condition {
        Condition::all()
            .add(like::Column::UserId.eq(self.actor.as_str()))
            .add(self.target.kind.column().eq(self.target.id.as_str()))
    }

    fn record(&self, id: String, now: DateTimeWithTimeZone) -> like::ActiveModel {
        let target = Some(self.target.id.to_string());
        let (video_id, comment_id, tweet_id) = match self.target.kind {
            LikeKind::Video => (target, None, None),
            LikeKind::Comment => (None, target, None),
            LikeKind::Tweet => (None, None, target),
        };

        like::ActiveModel {
            id: Set(id),
            user_id: Set(self.actor.clone()),
            video_id: Set(video_id),
            comment_id: Set(comment_id),
            tweet_id: Set(tweet_id),
            created_at: Set(now),
        }
    }
}

/// Subscribe or unsubscribe.
#[derive(Debug, Clone)]
pub struct SubscriptionToggle {
    subscriber: String,
    channel: EntityId,
}

impl SubscriptionToggle {
    /// Toggle `subscriber`'s subscription to `channel`.
    ///
    /// Subscribing to oneself is rejected here, before anything is looked up.
    pub fn new(subscriber: &str, channel: EntityId) -> AppResult<Self> {
        if subscriber == channel.as_str() {
            return Err(AppError::BadRequest(
                "You cannot subscribe to your own channel".to_string(),
            ));
        }

        Ok(Self {
            subscriber: subscriber.to_string(),
            channel,
        })
    }

    /// Channel being toggled.
    #[must_use]
    pub const fn channel(&self) -> &EntityId {
        &self.channel
    }
}

impl ToggleRelation for SubscriptionToggle {
    type Entity = subscription::Entity;

    fn key(&self) -> Condition {
        Condition::all()
            .add(subscription::Column::SubscriberId.eq(self.subscriber.as_str()))
            .add(subscription::Column::ChannelId.eq(self.channel.as_str()))
    }

    fn record(&self, id: String, now: DateTimeWithTimeZone) -> subscription::ActiveModel {
        subscription::ActiveModel {
            id: Set(id),
            subscriber_id: Set(self.subscriber.clone()),
            channel_id: Set(self.channel.to_string()),
            created_at: Set(now),
        }
    }
}

fn toggle_error(err: &DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Concurrent toggle on the same target".to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}

/// Runs toggles atomically.
#[derive(Clone)]
pub struct ToggleEngine {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl ToggleEngine {
    /// Create a new toggle engine.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Flip the relation and report which way it went.
    pub async fn toggle<R>(&self, relation: &R) -> AppResult<ToggleOutcome>
    where
        R: ToggleRelation + Sync,
        <R::Entity as EntityTrait>::Model: IntoActiveModel<<R::Entity as EntityTrait>::ActiveModel>,
    {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let removed = R::Entity::delete_many()
            .filter(relation.key())
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let outcome = if removed.rows_affected > 0 {
            ToggleOutcome::Removed
        } else {
            let record = relation.record(self.id_gen.generate(), Utc::now().into());
            R::Entity::insert(record)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| toggle_error(&e))?;
            ToggleOutcome::Added
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(outcome)
    }
}
