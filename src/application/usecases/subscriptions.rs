use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::interfaces::clock::Clock;
use crate::domain::{
    entities::subscriptions::InsertSubscriptionEntity,
    repositories::{
        plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    },
    value_objects::subscriptions::{CurrentSubscriptionDto, SubscriptionDto},
};
use crate::observability::audit::{AuditEvent, AuditTrail};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("user not found")]
    UserNotFound,
    #[error("plan not found")]
    PlanNotFound,
    #[error("no active subscription")]
    NoActiveSubscription,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::UserNotFound | SubscriptionError::PlanNotFound => {
                StatusCode::NOT_FOUND
            }
            SubscriptionError::NoActiveSubscription => StatusCode::BAD_REQUEST,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type SubscriptionResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<U, P, S, Clk>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    user_repo: Arc<U>,
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
    clock: Arc<Clk>,
    audit: AuditTrail,
}

impl<U, P, S, Clk> SubscriptionUseCase<U, P, S, Clk>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        plan_repo: Arc<P>,
        subscription_repo: Arc<S>,
        clock: Arc<Clk>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            user_repo,
            plan_repo,
            subscription_repo,
            clock,
            audit,
        }
    }

    /// Binds the user to the plan, deactivating whatever subscription was
    /// active before. The cancel-old-insert-new sequence runs in a single
    /// transaction at the repository seam.
    pub async fn bind(&self, user_id: Uuid, plan_id: Uuid) -> SubscriptionResult<SubscriptionDto> {
        info!(%user_id, %plan_id, "subscriptions: bind requested");

        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load user");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "subscriptions: bind for unknown user");
                SubscriptionError::UserNotFound
            })?;

        let plan = self
            .plan_repo
            .find_active_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%user_id, %plan_id, db_error = ?err, "subscriptions: failed to load plan");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, %plan_id, "subscriptions: plan missing or inactive");
                SubscriptionError::PlanNotFound
            })?;

        let now = self.clock.now();
        let ends_at = now + Duration::days(plan.coverage_days());

        let insert = InsertSubscriptionEntity {
            user_id,
            plan_id,
            starts_at: now,
            ends_at,
            canceled_at: None,
            cancellation_reason: None,
            auto_renew: false,
            is_active: true,
        };

        let subscription_id = self
            .subscription_repo
            .replace_active_subscription(insert)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %plan_id,
                    db_error = ?err,
                    "subscriptions: failed to replace active subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            %plan_id,
            %subscription_id,
            ends_at = %ends_at,
            "subscriptions: user bound to plan"
        );

        self.audit.record(AuditEvent::new(
            "subscription_bound",
            user_id,
            Some(subscription_id),
            format!("plan {plan_id}"),
        ));

        Ok(SubscriptionDto {
            id: subscription_id,
            user_id,
            plan_id,
            starts_at: now,
            ends_at,
            canceled_at: None,
            cancellation_reason: None,
            auto_renew: false,
            is_active: true,
        })
    }

    pub async fn get_current_subscription(
        &self,
        user_id: Uuid,
    ) -> SubscriptionResult<Option<CurrentSubscriptionDto>> {
        let now = self.clock.now();
        let subscription = match self
            .subscription_repo
            .find_current_active(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load current subscription");
                SubscriptionError::Internal(err)
            })? {
            Some(subscription) => subscription,
            None => {
                info!(%user_id, "subscriptions: no active subscription");
                return Ok(None);
            }
        };

        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    plan_id = %subscription.plan_id,
                    db_error = ?err,
                    "subscriptions: failed to load plan for current subscription"
                );
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                error!(
                    %user_id,
                    plan_id = %subscription.plan_id,
                    "subscriptions: subscription references missing plan"
                );
                SubscriptionError::Internal(anyhow::anyhow!("subscription references missing plan"))
            })?;

        Ok(Some(CurrentSubscriptionDto::from_parts(&subscription, &plan)))
    }

    pub async fn cancel(&self, user_id: Uuid, reason: Option<String>) -> SubscriptionResult<()> {
        let now = self.clock.now();
        let subscription = self
            .subscription_repo
            .find_current_active(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load subscription for cancel");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "subscriptions: cancel with no active subscription");
                SubscriptionError::NoActiveSubscription
            })?;

        self.subscription_repo
            .cancel_by_id(subscription.id, now, reason.clone())
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    subscription_id = %subscription.id,
                    db_error = ?err,
                    "subscriptions: failed to cancel subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = %subscription.id,
            reason = ?reason,
            "subscriptions: subscription canceled"
        );

        self.audit.record(AuditEvent::new(
            "subscription_canceled",
            user_id,
            Some(subscription.id),
            reason.unwrap_or_else(|| "no reason given".to_string()),
        ));

        Ok(())
    }
}
