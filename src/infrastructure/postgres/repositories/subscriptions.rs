use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    repositories::subscriptions::SubscriptionRepository,
    value_objects::subscriptions::PLAN_SWITCH_REASON,
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{app_users, subscriptions},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_current_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::is_active.eq(true))
            .filter(subscriptions::canceled_at.is_null())
            .filter(subscriptions::ends_at.ge(now))
            .order(subscriptions::starts_at.desc())
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn replace_active_subscription(
        &self,
        insert: InsertSubscriptionEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let new_id = conn.transaction::<Uuid, anyhow::Error, _>(|conn| {
            update(subscriptions::table)
                .filter(subscriptions::user_id.eq(insert.user_id))
                .filter(subscriptions::is_active.eq(true))
                .filter(subscriptions::canceled_at.is_null())
                .set((
                    subscriptions::is_active.eq(false),
                    subscriptions::canceled_at.eq(Some(insert.starts_at)),
                    subscriptions::cancellation_reason.eq(Some(PLAN_SWITCH_REASON.to_string())),
                    subscriptions::auto_renew.eq(false),
                ))
                .execute(conn)?;

            let new_id = insert_into(subscriptions::table)
                .values(&insert)
                .returning(subscriptions::id)
                .get_result::<Uuid>(conn)?;

            update(app_users::table)
                .filter(app_users::id.eq(insert.user_id))
                .set((
                    app_users::current_plan_id.eq(Some(insert.plan_id)),
                    app_users::updated_at.eq(insert.starts_at),
                ))
                .execute(conn)?;

            Ok(new_id)
        })?;

        Ok(new_id)
    }

    async fn cancel_by_id(
        &self,
        subscription_id: Uuid,
        canceled_at: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .set((
                subscriptions::is_active.eq(false),
                subscriptions::canceled_at.eq(Some(canceled_at)),
                subscriptions::cancellation_reason.eq(reason),
                subscriptions::auto_renew.eq(false),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
