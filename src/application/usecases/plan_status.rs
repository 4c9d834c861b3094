use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::interfaces::clock::Clock;
use crate::application::usecases::coverage::CoverageWindow;
use crate::domain::{
    repositories::{
        payments::PaymentRepository, plans::PlanRepository, subscriptions::SubscriptionRepository,
    },
    value_objects::enums::plan_tiers::PlanTier,
    value_objects::plans::PlanStatusDto,
};

#[derive(Debug, Error)]
pub enum PlanStatusError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanStatusError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub type PlanStatusResult<T> = std::result::Result<T, PlanStatusError>;

/// Computes, on demand, whether a subscription currently grants access.
/// Consumed by access-control middleware outside this core.
pub struct PlanStatusUseCase<S, P, Pay, Clk>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    subscription_repo: Arc<S>,
    plan_repo: Arc<P>,
    payment_repo: Arc<Pay>,
    clock: Arc<Clk>,
}

impl<S, P, Pay, Clk> PlanStatusUseCase<S, P, Pay, Clk>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    pub fn new(
        subscription_repo: Arc<S>,
        plan_repo: Arc<P>,
        payment_repo: Arc<Pay>,
        clock: Arc<Clk>,
    ) -> Self {
        Self {
            subscription_repo,
            plan_repo,
            payment_repo,
            clock,
        }
    }

    pub async fn get_status(&self, user_id: Uuid) -> PlanStatusResult<PlanStatusDto> {
        let now = self.clock.now();

        let subscription = match self
            .subscription_repo
            .find_current_active(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "plan_status: failed to load subscription");
                PlanStatusError::Internal(err)
            })? {
            Some(subscription) => subscription,
            None => {
                info!(%user_id, "plan_status: no subscription");
                return Ok(PlanStatusDto::without_subscription());
            }
        };

        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "plan_status: failed to load plan");
                PlanStatusError::Internal(err)
            })?
            .ok_or_else(|| {
                error!(
                    %user_id,
                    plan_id = %subscription.plan_id,
                    "plan_status: subscription references missing plan"
                );
                PlanStatusError::Internal(anyhow::anyhow!("subscription references missing plan"))
            })?;

        let last_approved = self
            .payment_repo
            .find_latest_approved(subscription.id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "plan_status: failed to load payment history");
                PlanStatusError::Internal(err)
            })?;

        let window = CoverageWindow::compute(&subscription, &plan, last_approved.as_ref());
        let contract_valid = now <= subscription.ends_at;
        let paid_in_period = window.covers(now);
        let plan_valid = contract_valid && paid_in_period;

        let message = if plan_valid {
            format!(
                "Plan active; coverage runs until {}.",
                window.deadline.format("%Y-%m-%d")
            )
        } else if !contract_valid {
            "Contract expired.".to_string()
        } else if !window.has_approved_payment {
            "No approved payment yet.".to_string()
        } else {
            format!(
                "Payment lapsed; coverage ended {}.",
                window.deadline.format("%Y-%m-%d")
            )
        };

        info!(
            %user_id,
            plan_valid,
            paid_in_period,
            coverage_deadline = %window.deadline,
            "plan_status: status computed"
        );

        Ok(PlanStatusDto {
            plan_valid,
            tier: PlanTier::from_str(&plan.tier),
            plan_name: Some(plan.name.clone()),
            starts_at: Some(subscription.starts_at),
            ends_at: Some(subscription.ends_at),
            payment_approved: window.has_approved_payment,
            coverage_deadline: Some(window.deadline),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::interfaces::clock::MockClock;
    use crate::domain::entities::{
        payments::PaymentEntity, plans::PlanEntity, subscriptions::SubscriptionEntity,
    };
    use crate::domain::repositories::{
        payments::MockPaymentRepository, plans::MockPlanRepository,
        subscriptions::MockSubscriptionRepository,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn sample_plan(id: Uuid) -> PlanEntity {
        PlanEntity {
            id,
            name: "Pro".to_string(),
            tier: "pro".to_string(),
            price_minor: 59990,
            duration_days: Some(365),
            is_active: true,
            created_at: fixed_now(),
            updated_at: fixed_now(),
        }
    }

    fn sample_subscription(user_id: Uuid, plan_id: Uuid) -> SubscriptionEntity {
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id,
            plan_id,
            starts_at: fixed_now() - Duration::days(10),
            ends_at: fixed_now() + Duration::days(355),
            canceled_at: None,
            cancellation_reason: None,
            auto_renew: false,
            is_active: true,
            created_at: fixed_now() - Duration::days(10),
        }
    }

    fn approved_payment(subscription_id: Uuid, paid_at: DateTime<Utc>) -> PaymentEntity {
        PaymentEntity {
            id: Uuid::new_v4(),
            subscription_id,
            amount_minor: 59990,
            status: "approved".to_string(),
            payment_method: Some("pix".to_string()),
            paid_at,
            due_at: None,
            created_by: Uuid::new_v4(),
            created_at: paid_at,
        }
    }

    fn clock_at(now: DateTime<Utc>) -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || now);
        clock
    }

    fn usecase_with(
        subscription: Option<SubscriptionEntity>,
        plan: PlanEntity,
        payment: Option<PaymentEntity>,
        now: DateTime<Utc>,
    ) -> PlanStatusUseCase<
        MockSubscriptionRepository,
        MockPlanRepository,
        MockPaymentRepository,
        MockClock,
    > {
        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        subscription_repo
            .expect_find_current_active()
            .returning(move |_, _| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(subscription) })
            });
        plan_repo.expect_find_by_id().returning(move |_| {
            let plan = plan.clone();
            Box::pin(async move { Ok(Some(plan)) })
        });
        payment_repo.expect_find_latest_approved().returning(move |_| {
            let payment = payment.clone();
            Box::pin(async move { Ok(payment) })
        });

        PlanStatusUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(plan_repo),
            Arc::new(payment_repo),
            Arc::new(clock_at(now)),
        )
    }

    #[tokio::test]
    async fn reports_no_subscription() {
        let plan = sample_plan(Uuid::new_v4());
        let usecase = usecase_with(None, plan, None, fixed_now());

        let status = usecase.get_status(Uuid::new_v4()).await.unwrap();

        assert!(!status.plan_valid);
        assert_eq!(status.message, "no subscription");
        assert!(status.tier.is_none());
    }

    #[tokio::test]
    async fn fresh_binding_without_payment_is_invalid() {
        let user_id = Uuid::new_v4();
        let plan = sample_plan(Uuid::new_v4());
        let subscription = sample_subscription(user_id, plan.id);
        let usecase = usecase_with(Some(subscription), plan, None, fixed_now());

        let status = usecase.get_status(user_id).await.unwrap();

        assert!(!status.plan_valid);
        assert!(!status.payment_approved);
        assert_eq!(status.message, "No approved payment yet.");
        assert_eq!(status.tier, Some(PlanTier::Pro));
    }

    #[tokio::test]
    async fn approved_payment_makes_plan_valid_for_a_year() {
        let user_id = Uuid::new_v4();
        let plan = sample_plan(Uuid::new_v4());
        let subscription = sample_subscription(user_id, plan.id);
        let paid_at = fixed_now() - Duration::days(2);
        let payment = approved_payment(subscription.id, paid_at);

        let usecase = usecase_with(Some(subscription), plan, Some(payment), fixed_now());
        let status = usecase.get_status(user_id).await.unwrap();

        assert!(status.plan_valid);
        assert!(status.payment_approved);
        assert_eq!(
            status.coverage_deadline,
            Some(paid_at + Duration::days(365))
        );
    }

    #[tokio::test]
    async fn coverage_deadline_instant_is_still_valid() {
        let user_id = Uuid::new_v4();
        let plan = sample_plan(Uuid::new_v4());
        let mut subscription = sample_subscription(user_id, plan.id);
        let paid_at = fixed_now() - Duration::days(365);
        subscription.ends_at = fixed_now() + Duration::days(1);
        let payment = approved_payment(subscription.id, paid_at);

        // now sits exactly on paid_at + 365d
        let usecase = usecase_with(Some(subscription), plan, Some(payment), fixed_now());
        let status = usecase.get_status(user_id).await.unwrap();

        assert!(status.plan_valid);
    }

    #[tokio::test]
    async fn lapsed_payment_reports_coverage_end() {
        let user_id = Uuid::new_v4();
        let plan = sample_plan(Uuid::new_v4());
        let mut subscription = sample_subscription(user_id, plan.id);
        subscription.starts_at = fixed_now() - Duration::days(400);
        subscription.ends_at = fixed_now() + Duration::days(10);
        let paid_at = fixed_now() - Duration::days(366);
        let payment = approved_payment(subscription.id, paid_at);

        let usecase = usecase_with(Some(subscription), plan, Some(payment), fixed_now());
        let status = usecase.get_status(user_id).await.unwrap();

        assert!(!status.plan_valid);
        assert!(status.payment_approved);
        assert!(status.message.starts_with("Payment lapsed"));
    }
}
