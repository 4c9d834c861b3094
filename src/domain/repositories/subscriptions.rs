use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Most recent subscription with `is_active`, no `canceled_at`, and
    /// `ends_at >= now`.
    async fn find_current_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>>;

    /// Deactivates every active subscription of `insert.user_id` (stamping
    /// `canceled_at = insert.starts_at` and the plan-switch reason), inserts
    /// the new row, and moves the user's plan pointer. One transaction: a
    /// concurrent switch can never observe zero or two active rows.
    async fn replace_active_subscription(
        &self,
        insert: InsertSubscriptionEntity,
    ) -> Result<Uuid>;

    async fn cancel_by_id(
        &self,
        subscription_id: Uuid,
        canceled_at: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<()>;
}
