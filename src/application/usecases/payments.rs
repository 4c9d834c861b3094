use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::interfaces::clock::Clock;
use crate::application::usecases::coverage::CoverageWindow;
use crate::domain::{
    entities::charges::ChargeEntity,
    entities::payments::NewPaymentEntity,
    entities::plans::PlanEntity,
    entities::subscriptions::SubscriptionEntity,
    repositories::{
        charges::ChargeRepository, payments::PaymentRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::enums::{payment_methods::PaymentMethod, payment_statuses::PaymentStatus},
    value_objects::money,
    value_objects::payments::{PaymentDto, RegisterPaymentRequest},
};
use crate::observability::audit::{AuditEvent, AuditTrail};

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("no active subscription")]
    NoActiveSubscription,
    #[error("already paid for the current period; covered until {covered_until}")]
    AlreadyCovered { covered_until: DateTime<Utc> },
    #[error("no pending charge with this code")]
    ChargeNotFound,
    #[error("charge expired on {due_at}, generate a new one")]
    ChargeExpired { due_at: DateTime<Utc> },
    #[error("stale charge code, use the latest one")]
    StaleChargeCode,
    #[error("amount mismatch; expected {expected:.2}")]
    AmountMismatch { expected: f64 },
    #[error("invalid payment amount")]
    InvalidAmount,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::NoActiveSubscription
            | PaymentError::AlreadyCovered { .. }
            | PaymentError::ChargeNotFound
            | PaymentError::ChargeExpired { .. }
            | PaymentError::StaleChargeCode
            | PaymentError::AmountMismatch { .. }
            | PaymentError::InvalidAmount => StatusCode::BAD_REQUEST,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

pub struct PaymentUseCase<S, P, C, Pay, Clk>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: ChargeRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    subscription_repo: Arc<S>,
    plan_repo: Arc<P>,
    charge_repo: Arc<C>,
    payment_repo: Arc<Pay>,
    clock: Arc<Clk>,
    audit: AuditTrail,
}

impl<S, P, C, Pay, Clk> PaymentUseCase<S, P, C, Pay, Clk>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: ChargeRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    pub fn new(
        subscription_repo: Arc<S>,
        plan_repo: Arc<P>,
        charge_repo: Arc<C>,
        payment_repo: Arc<Pay>,
        clock: Arc<Clk>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            subscription_repo,
            plan_repo,
            charge_repo,
            payment_repo,
            clock,
            audit,
        }
    }

    pub async fn register(
        &self,
        user_id: Uuid,
        request: RegisterPaymentRequest,
    ) -> PaymentResult<PaymentDto> {
        let now = self.clock.now();
        info!(
            %user_id,
            charge_code = ?request.charge_code,
            "payments: register requested"
        );

        let subscription = self
            .subscription_repo
            .find_current_active(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load subscription");
                PaymentError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "payments: register with no active subscription");
                PaymentError::NoActiveSubscription
            })?;

        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load plan");
                PaymentError::Internal(err)
            })?
            .ok_or_else(|| {
                error!(
                    %user_id,
                    plan_id = %subscription.plan_id,
                    "payments: subscription references missing plan"
                );
                PaymentError::Internal(anyhow::anyhow!("subscription references missing plan"))
            })?;

        let last_approved = self
            .payment_repo
            .find_latest_approved(subscription.id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load payment history");
                PaymentError::Internal(err)
            })?;

        let window = CoverageWindow::compute(&subscription, &plan, last_approved.as_ref());
        if window.covers(now) {
            warn!(
                %user_id,
                covered_until = %window.deadline,
                "payments: register while period is already paid"
            );
            return Err(PaymentError::AlreadyCovered {
                covered_until: window.deadline,
            });
        }

        match request.charge_code.clone() {
            Some(code) => {
                self.register_against_charge(user_id, &subscription, now, &code, request.amount)
                    .await
            }
            None => {
                self.register_unmatched(user_id, &subscription, &plan, now, request)
                    .await
            }
        }
    }

    /// A payment that names a charge code settles that charge and is approved
    /// synchronously, provided the charge is still the live one.
    async fn register_against_charge(
        &self,
        user_id: Uuid,
        subscription: &SubscriptionEntity,
        now: DateTime<Utc>,
        code: &str,
        supplied_amount: Option<f64>,
    ) -> PaymentResult<PaymentDto> {
        let charge = self
            .charge_repo
            .find_pending_by_code(subscription.id, code)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to look up charge");
                PaymentError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, code, "payments: no pending charge for code");
                PaymentError::ChargeNotFound
            })?;

        if now > charge.due_at {
            warn!(%user_id, code, due_at = %charge.due_at, "payments: charge expired");
            return Err(PaymentError::ChargeExpired {
                due_at: charge.due_at,
            });
        }

        let latest_pending = self
            .charge_repo
            .find_latest_pending(subscription.id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load latest charge");
                PaymentError::Internal(err)
            })?;
        if latest_pending.map(|latest| latest.id) != Some(charge.id) {
            warn!(%user_id, code, "payments: superseded charge code");
            return Err(PaymentError::StaleChargeCode);
        }

        if let Some(supplied) = supplied_amount {
            ensure_amount_matches(user_id, i64::from(charge.amount_minor), supplied)?;
        }

        let payment = NewPaymentEntity {
            subscription_id: subscription.id,
            amount_minor: charge.amount_minor,
            status: PaymentStatus::Approved.to_string(),
            payment_method: Some(charge.payment_method.clone()),
            paid_at: now,
            due_at: Some(charge.due_at),
            created_by: user_id,
        };

        let payment_id = self
            .payment_repo
            .record_payment_settling_charge(payment, charge.id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    charge_id = %charge.id,
                    db_error = ?err,
                    "payments: failed to record approved payment"
                );
                PaymentError::Internal(err)
            })?;

        info!(
            %user_id,
            %payment_id,
            charge_id = %charge.id,
            "payments: payment approved and charge settled"
        );

        self.audit.record(AuditEvent::new(
            "payment_registered",
            user_id,
            Some(payment_id),
            format!("approved against charge {}", charge.code),
        ));

        Ok(self.build_dto(payment_id, subscription.id, &charge, now))
    }

    /// No charge code: the payment is recorded against the plan price and
    /// stays in processing; nothing settles it later in this core.
    async fn register_unmatched(
        &self,
        user_id: Uuid,
        subscription: &SubscriptionEntity,
        plan: &PlanEntity,
        now: DateTime<Utc>,
        request: RegisterPaymentRequest,
    ) -> PaymentResult<PaymentDto> {
        let amount_minor = match request.amount {
            Some(supplied) => {
                ensure_amount_matches(user_id, i64::from(plan.price_minor), supplied)?;
                let minor = money::to_minor(supplied);
                if minor <= 0 {
                    warn!(%user_id, supplied, "payments: non-positive amount");
                    return Err(PaymentError::InvalidAmount);
                }
                i32::try_from(minor).map_err(|_| {
                    warn!(%user_id, supplied, "payments: amount out of range");
                    PaymentError::InvalidAmount
                })?
            }
            None => plan.price_minor,
        };

        let payment = NewPaymentEntity {
            subscription_id: subscription.id,
            amount_minor,
            status: PaymentStatus::Processing.to_string(),
            payment_method: request.payment_method.map(|method| method.to_string()),
            paid_at: now,
            due_at: None,
            created_by: user_id,
        };

        let payment_id = self
            .payment_repo
            .record_payment(payment)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to record payment");
                PaymentError::Internal(err)
            })?;

        info!(%user_id, %payment_id, "payments: payment recorded as processing");

        self.audit.record(AuditEvent::new(
            "payment_registered",
            user_id,
            Some(payment_id),
            "processing, no charge matched".to_string(),
        ));

        Ok(PaymentDto {
            id: payment_id,
            subscription_id: subscription.id,
            amount: money::from_minor(amount_minor),
            status: PaymentStatus::Processing,
            payment_method: request.payment_method,
            paid_at: now,
            due_at: None,
            message: "Payment registered and awaiting confirmation.".to_string(),
        })
    }

    fn build_dto(
        &self,
        payment_id: Uuid,
        subscription_id: Uuid,
        charge: &ChargeEntity,
        now: DateTime<Utc>,
    ) -> PaymentDto {
        PaymentDto {
            id: payment_id,
            subscription_id,
            amount: money::from_minor(charge.amount_minor),
            status: PaymentStatus::Approved,
            payment_method: PaymentMethod::from_str(&charge.payment_method),
            paid_at: now,
            due_at: Some(charge.due_at),
            message: format!("Payment approved; charge {} settled.", charge.code),
        }
    }
}

fn ensure_amount_matches(
    user_id: Uuid,
    expected_minor: i64,
    supplied: f64,
) -> PaymentResult<()> {
    let supplied_minor = money::to_minor(supplied);
    if !money::within_tolerance(expected_minor, supplied_minor) {
        let expected = expected_minor as f64 / 100.0;
        warn!(
            %user_id,
            expected,
            supplied,
            "payments: amount mismatch"
        );
        return Err(PaymentError::AmountMismatch { expected });
    }
    Ok(())
}
