use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{plans::PlanEntity, subscriptions::SubscriptionEntity};
use crate::domain::value_objects::enums::plan_tiers::PlanTier;

/// Reason stamped on subscriptions deactivated by a plan switch.
pub const PLAN_SWITCH_REASON: &str = "Plan switch";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub auto_renew: bool,
    pub is_active: bool,
}

impl From<SubscriptionEntity> for SubscriptionDto {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            plan_id: value.plan_id,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            canceled_at: value.canceled_at,
            cancellation_reason: value.cancellation_reason,
            auto_renew: value.auto_renew,
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentSubscriptionDto {
    pub subscription_id: Uuid,
    pub plan_id: Uuid,
    pub plan_name: String,
    pub tier: Option<PlanTier>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub auto_renew: bool,
}

impl CurrentSubscriptionDto {
    pub fn from_parts(subscription: &SubscriptionEntity, plan: &PlanEntity) -> Self {
        Self {
            subscription_id: subscription.id,
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            tier: PlanTier::from_str(&plan.tier),
            starts_at: subscription.starts_at,
            ends_at: subscription.ends_at,
            auto_renew: subscription.auto_renew,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BindSubscriptionRequest {
    pub user_id: Uuid,
    pub plan_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelSubscriptionRequest {
    pub reason: Option<String>,
}
