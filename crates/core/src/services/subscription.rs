//! Subscription service.

use vidhub_common::{AppError, AppResult, EntityId};
use vidhub_db::repositories::{SubscriptionRepository, UserRepository};

use crate::toggle::{SubscriptionToggle, ToggleEngine, ToggleOutcome};
use crate::views::UserSummary;

/// Service for channel subscriptions.
#[derive(Clone)]
pub struct SubscriptionService {
    engine: ToggleEngine,
    subscription_repo: SubscriptionRepository,
    user_repo: UserRepository,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(
        engine: ToggleEngine,
        subscription_repo: SubscriptionRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            engine,
            subscription_repo,
            user_repo,
        }
    }

    /// Subscribe to or unsubscribe from a channel.
    pub async fn toggle(&self, subscriber_id: &str, channel_id: EntityId) -> AppResult<ToggleOutcome> {
        let toggle = SubscriptionToggle::new(subscriber_id, channel_id)?;

        if self
            .user_repo
            .find_by_id(toggle.channel().as_str())
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Channel not found".to_string()));
        }

        self.engine.toggle(&toggle).await
    }

    /// Users subscribed to a channel, most recent first.
    pub async fn channel_subscribers(&self, channel_id: &str) -> AppResult<Vec<UserSummary>> {
        let ids: Vec<String> = self
            .subscription_repo
            .find_by_channel(channel_id)
            .await?
            .into_iter()
            .map(|s| s.subscriber_id)
            .collect();
        self.summaries_in_order(&ids).await
    }

    /// Channels a user subscribed to, most recent first.
    pub async fn subscribed_channels(&self, subscriber_id: &str) -> AppResult<Vec<UserSummary>> {
        let ids: Vec<String> = self
            .subscription_repo
            .find_by_subscriber(subscriber_id)
            .await?
            .into_iter()
            .map(|s| s.channel_id)
            .collect();
        self.summaries_in_order(&ids).await
    }

    async fn summaries_in_order(&self, ids: &[String]) -> AppResult<Vec<UserSummary>> {
        let mut users = crate::views::user_index(&self.user_repo.find_by_ids(ids).await?);
        Ok(ids.iter().filter_map(|id| users.remove(id)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::test_user;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use vidhub_db::entities::{subscription, user};

    const ME: &str = "01hzy3j5k0abcdefghjkmnpqrs";
    const CHANNEL: &str = "01hzy3j5k0abcdefghjkmnpqrt";

    fn empty_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn create_test_service(
        toggle_db: DatabaseConnection,
        subscription_db: DatabaseConnection,
        user_db: DatabaseConnection,
    ) -> SubscriptionService {
        SubscriptionService::new(
            ToggleEngine::new(Arc::new(toggle_db)),
            SubscriptionRepository::new(Arc::new(subscription_db)),
            UserRepository::new(Arc::new(user_db)),
        )
    }

    #[tokio::test]
    async fn test_self_subscription_rejected_without_lookup() {
        // Any query against the empty mocks would fail with a database error
        let service = create_test_service(empty_db(), empty_db(), empty_db());

        let err = service
            .toggle(ME, EntityId::parse(ME, "channel").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_toggle_unknown_channel() {
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = create_test_service(empty_db(), empty_db(), user_db);

        let err = service
            .toggle(ME, EntityId::parse(CHANNEL, "channel").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Channel not found"));
    }

    #[tokio::test]
    async fn test_toggle_unsubscribes_existing() {
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user(CHANNEL, "chan")]])
            .into_connection();
        let toggle_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = create_test_service(toggle_db, empty_db(), user_db);

        let outcome = service
            .toggle(ME, EntityId::parse(CHANNEL, "channel").unwrap())
            .await
            .unwrap();
        assert_eq!(outcome, ToggleOutcome::Removed);
    }

    #[tokio::test]
    async fn test_channel_subscribers_in_subscription_order() {
        let sub = |id: &str, subscriber: &str| subscription::Model {
            id: id.to_string(),
            subscriber_id: subscriber.to_string(),
            channel_id: "c1".to_string(),
            created_at: Utc::now().into(),
        };
        let subscription_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[sub("s2", "u2"), sub("s1", "u1")]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u1", "alice"), test_user("u2", "bob")]])
            .into_connection();
        let service = create_test_service(empty_db(), subscription_db, user_db);

        let subscribers = service.channel_subscribers("c1").await.unwrap();

        let names: Vec<_> = subscribers.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["bob", "alice"]);
    }
}
