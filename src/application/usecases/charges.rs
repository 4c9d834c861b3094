use std::sync::Arc;

use chrono::{DateTime, Duration, Timelike, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::interfaces::{clock::Clock, code_source::CodeSource};
use crate::application::usecases::coverage::CoverageWindow;
use crate::domain::{
    entities::charges::InsertChargeEntity,
    repositories::{
        charges::ChargeRepository, payments::PaymentRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::charges::{ChargeDto, ChargeInsertOutcome, GenerateChargeRequest},
    value_objects::enums::{charge_statuses::ChargeStatus, payment_methods::PaymentMethod},
    value_objects::money,
};
use crate::observability::audit::{AuditEvent, AuditTrail};

const DUE_IN_DAYS: i64 = 3;
const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum ChargeError {
    #[error("no active subscription")]
    NoActiveSubscription,
    #[error("already paid for the current period; covered until {covered_until}")]
    AlreadyCovered { covered_until: DateTime<Utc> },
    #[error("invalid charge amount")]
    InvalidAmount,
    #[error("could not allocate a unique charge code")]
    CodeGenerationExhausted,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ChargeError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ChargeError::NoActiveSubscription
            | ChargeError::AlreadyCovered { .. }
            | ChargeError::InvalidAmount => StatusCode::BAD_REQUEST,
            ChargeError::CodeGenerationExhausted | ChargeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type ChargeResult<T> = std::result::Result<T, ChargeError>;

pub struct ChargeUseCase<S, P, Pay, C, Clk, Code>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    C: ChargeRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
    Code: CodeSource + 'static,
{
    subscription_repo: Arc<S>,
    plan_repo: Arc<P>,
    payment_repo: Arc<Pay>,
    charge_repo: Arc<C>,
    clock: Arc<Clk>,
    code_source: Arc<Code>,
    audit: AuditTrail,
}

impl<S, P, Pay, C, Clk, Code> ChargeUseCase<S, P, Pay, C, Clk, Code>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    C: ChargeRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
    Code: CodeSource + 'static,
{
    pub fn new(
        subscription_repo: Arc<S>,
        plan_repo: Arc<P>,
        payment_repo: Arc<Pay>,
        charge_repo: Arc<C>,
        clock: Arc<Clk>,
        code_source: Arc<Code>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            subscription_repo,
            plan_repo,
            payment_repo,
            charge_repo,
            clock,
            code_source,
            audit,
        }
    }

    pub async fn generate(
        &self,
        user_id: Uuid,
        request: GenerateChargeRequest,
    ) -> ChargeResult<ChargeDto> {
        let now = self.clock.now();
        info!(
            %user_id,
            payment_method = %request.payment_method,
            "charges: generate requested"
        );

        let subscription = self
            .subscription_repo
            .find_current_active(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "charges: failed to load subscription");
                ChargeError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "charges: generate with no active subscription");
                ChargeError::NoActiveSubscription
            })?;

        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "charges: failed to load plan");
                ChargeError::Internal(err)
            })?
            .ok_or_else(|| {
                error!(
                    %user_id,
                    plan_id = %subscription.plan_id,
                    "charges: subscription references missing plan"
                );
                ChargeError::Internal(anyhow::anyhow!("subscription references missing plan"))
            })?;

        let last_approved = self
            .payment_repo
            .find_latest_approved(subscription.id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "charges: failed to load payment history");
                ChargeError::Internal(err)
            })?;

        let window = CoverageWindow::compute(&subscription, &plan, last_approved.as_ref());
        if window.covers(now) {
            warn!(
                %user_id,
                covered_until = %window.deadline,
                "charges: generate while period is already paid"
            );
            return Err(ChargeError::AlreadyCovered {
                covered_until: window.deadline,
            });
        }

        let amount_minor = match request.amount {
            Some(amount) => {
                let minor = money::to_minor(amount);
                if minor <= 0 {
                    warn!(%user_id, amount, "charges: non-positive amount");
                    return Err(ChargeError::InvalidAmount);
                }
                i32::try_from(minor).map_err(|_| {
                    warn!(%user_id, amount, "charges: amount out of range");
                    ChargeError::InvalidAmount
                })?
            }
            None => plan.price_minor,
        };

        let due_at = end_of_day(now + Duration::days(DUE_IN_DAYS));

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = build_charge_code(request.payment_method, now, self.code_source.as_ref());
            let insert = InsertChargeEntity {
                subscription_id: subscription.id,
                payment_method: request.payment_method.to_string(),
                amount_minor,
                code: code.clone(),
                due_at,
                status: ChargeStatus::Pending.to_string(),
            };

            let outcome = self.charge_repo.insert_pending(insert).await.map_err(|err| {
                error!(%user_id, db_error = ?err, "charges: failed to persist charge");
                ChargeError::Internal(err)
            })?;

            match outcome {
                ChargeInsertOutcome::Created(charge_id) => {
                    info!(
                        %user_id,
                        %charge_id,
                        code = %code,
                        due_at = %due_at,
                        "charges: charge created"
                    );

                    self.audit.record(AuditEvent::new(
                        "charge_generated",
                        user_id,
                        Some(charge_id),
                        format!("code {code}"),
                    ));

                    return Ok(ChargeDto {
                        id: charge_id,
                        subscription_id: subscription.id,
                        code: code.clone(),
                        payment_method: request.payment_method,
                        amount: money::from_minor(amount_minor),
                        due_at,
                        status: ChargeStatus::Pending,
                        instructions: payment_instructions(request.payment_method, &code, due_at),
                    });
                }
                ChargeInsertOutcome::CodeTaken => {
                    warn!(%user_id, attempt, code = %code, "charges: code collision, retrying");
                }
            }
        }

        error!(
            %user_id,
            attempts = MAX_CODE_ATTEMPTS,
            "charges: exhausted code generation attempts"
        );
        Err(ChargeError::CodeGenerationExhausted)
    }
}

/// Method-keyed code: prefix, `YYYYMMDDHHmmss` timestamp, random suffix.
fn build_charge_code<Code: CodeSource + ?Sized>(
    method: PaymentMethod,
    now: DateTime<Utc>,
    source: &Code,
) -> String {
    let timestamp = now.format("%Y%m%d%H%M%S");
    match method {
        PaymentMethod::Pix => format!("PIX-{}-{}", timestamp, source.alphanumeric(20)),
        PaymentMethod::Boleto => format!("BOL-{}-{}", timestamp, source.digits(10)),
        PaymentMethod::CreditCard => format!("CC-{}-{}", timestamp, source.alphanumeric(8)),
    }
}

fn end_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_hour(23)
        .and_then(|t| t.with_minute(59))
        .and_then(|t| t.with_second(59))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

fn payment_instructions(method: PaymentMethod, code: &str, due_at: DateTime<Utc>) -> String {
    let due_date = due_at.format("%Y-%m-%d");
    match method {
        PaymentMethod::Pix => format!(
            "Pay with the Pix copy-and-paste code {code}. The code is valid until {due_date}."
        ),
        PaymentMethod::Boleto => format!(
            "Pay the boleto using the number {code} at any bank before {due_date}."
        ),
        PaymentMethod::CreditCard => format!(
            "Confirm the card payment referencing {code} by {due_date}."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::interfaces::clock::MockClock;
    use crate::application::interfaces::code_source::MockCodeSource;
    use crate::domain::entities::{
        payments::PaymentEntity, plans::PlanEntity, subscriptions::SubscriptionEntity,
    };
    use crate::domain::repositories::{
        charges::MockChargeRepository, payments::MockPaymentRepository,
        plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
    };
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 34, 56).unwrap()
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

    fn clock() -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().returning(fixed_now);
        clock
    }

    struct Mocks {
        subscription_repo: MockSubscriptionRepository,
        plan_repo: MockPlanRepository,
        payment_repo: MockPaymentRepository,
        charge_repo: MockChargeRepository,
        code_source: MockCodeSource,
    }

    fn happy_mocks(user_id: Uuid) -> (Mocks, SubscriptionEntity) {
        let plan_id = Uuid::new_v4();
        let subscription = sample_subscription(user_id, plan_id);

        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        let returned = subscription.clone();
        subscription_repo
            .expect_find_current_active()
            .returning(move |_, _| {
                let subscription = returned.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });
        plan_repo.expect_find_by_id().returning(move |_| {
            let plan = sample_plan(plan_id);
            Box::pin(async move { Ok(Some(plan)) })
        });
        payment_repo
            .expect_find_latest_approved()
            .returning(|_| Box::pin(async { Ok(None) }));

        (
            Mocks {
                subscription_repo,
                plan_repo,
                payment_repo,
                charge_repo: MockChargeRepository::new(),
                code_source: MockCodeSource::new(),
            },
            subscription,
        )
    }

    fn usecase(
        mocks: Mocks,
    ) -> ChargeUseCase<
        MockSubscriptionRepository,
        MockPlanRepository,
        MockPaymentRepository,
        MockChargeRepository,
        MockClock,
        MockCodeSource,
    > {
        ChargeUseCase::new(
            Arc::new(mocks.subscription_repo),
            Arc::new(mocks.plan_repo),
            Arc::new(mocks.payment_repo),
            Arc::new(mocks.charge_repo),
            Arc::new(clock()),
            Arc::new(mocks.code_source),
            AuditTrail::disabled(),
        )
    }

    #[tokio::test]
    async fn generates_pix_charge_with_plan_price_and_due_date() {
        let user_id = Uuid::new_v4();
        let (mut mocks, subscription) = happy_mocks(user_id);
        let charge_id = Uuid::new_v4();

        mocks
            .code_source
            .expect_alphanumeric()
            .returning(|len| "A".repeat(len));
        mocks
            .charge_repo
            .expect_insert_pending()
            .withf(move |insert| {
                insert.subscription_id == subscription.id
                    && insert.amount_minor == 59990
                    && insert.code == format!("PIX-20250310123456-{}", "A".repeat(20))
                    && insert.status == "pending"
                    && insert.due_at
                        == Utc.with_ymd_and_hms(2025, 3, 13, 23, 59, 59).unwrap()
            })
            .returning(move |_| Box::pin(async move { Ok(ChargeInsertOutcome::Created(charge_id)) }));

        let charge = usecase(mocks)
            .generate(
                user_id,
                GenerateChargeRequest {
                    payment_method: PaymentMethod::Pix,
                    amount: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(charge.id, charge_id);
        assert_eq!(charge.amount, 599.90);
        assert_eq!(charge.status, ChargeStatus::Pending);
        assert!(charge.code.starts_with("PIX-20250310123456-"));
        assert!(charge.instructions.contains(&charge.code));
    }

    #[tokio::test]
    async fn boleto_codes_carry_a_digit_suffix() {
        let user_id = Uuid::new_v4();
        let (mut mocks, _) = happy_mocks(user_id);

        mocks
            .code_source
            .expect_digits()
            .returning(|len| "7".repeat(len));
        mocks
            .charge_repo
            .expect_insert_pending()
            .withf(|insert| insert.code == "BOL-20250310123456-7777777777")
            .returning(|_| Box::pin(async { Ok(ChargeInsertOutcome::Created(Uuid::new_v4())) }));

        let charge = usecase(mocks)
            .generate(
                user_id,
                GenerateChargeRequest {
                    payment_method: PaymentMethod::Boleto,
                    amount: Some(599.90),
                },
            )
            .await
            .unwrap();

        assert!(charge.code.starts_with("BOL-"));
    }

    #[tokio::test]
    async fn rejects_generation_while_period_is_covered() {
        let user_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();
        let subscription = sample_subscription(user_id, plan_id);
        let paid_at = fixed_now() - Duration::days(5);
        let payment = approved_payment(subscription.id, paid_at);

        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        subscription_repo
            .expect_find_current_active()
            .returning(move |_, _| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });
        plan_repo.expect_find_by_id().returning(move |_| {
            let plan = sample_plan(plan_id);
            Box::pin(async move { Ok(Some(plan)) })
        });
        payment_repo.expect_find_latest_approved().returning(move |_| {
            let payment = payment.clone();
            Box::pin(async move { Ok(Some(payment)) })
        });

        let usecase = ChargeUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(plan_repo),
            Arc::new(payment_repo),
            Arc::new(MockChargeRepository::new()),
            Arc::new(clock()),
            Arc::new(MockCodeSource::new()),
            AuditTrail::disabled(),
        );

        let err = usecase
            .generate(
                user_id,
                GenerateChargeRequest {
                    payment_method: PaymentMethod::Pix,
                    amount: None,
                },
            )
            .await
            .unwrap_err();

        match err {
            ChargeError::AlreadyCovered { covered_until } => {
                assert_eq!(covered_until, paid_at + Duration::days(365));
            }
            other => panic!("expected AlreadyCovered, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn retries_on_code_collision_then_succeeds() {
        let user_id = Uuid::new_v4();
        let (mut mocks, _) = happy_mocks(user_id);
        let charge_id = Uuid::new_v4();

        let mut suffixes = vec!["AAAAAAAA", "AAAAAAAA", "BBBBBBBB"].into_iter();
        mocks
            .code_source
            .expect_alphanumeric()
            .times(3)
            .returning(move |_| suffixes.next().unwrap().to_string());

        let mut outcomes = vec![
            ChargeInsertOutcome::CodeTaken,
            ChargeInsertOutcome::CodeTaken,
            ChargeInsertOutcome::Created(charge_id),
        ]
        .into_iter();
        mocks
            .charge_repo
            .expect_insert_pending()
            .times(3)
            .returning(move |_| {
                let outcome = outcomes.next().unwrap();
                Box::pin(async move { Ok(outcome) })
            });

        let charge = usecase(mocks)
            .generate(
                user_id,
                GenerateChargeRequest {
                    payment_method: PaymentMethod::CreditCard,
                    amount: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(charge.id, charge_id);
        assert_eq!(charge.code, "CC-20250310123456-BBBBBBBB");
    }

    #[tokio::test]
    async fn gives_up_after_five_collisions() {
        let user_id = Uuid::new_v4();
        let (mut mocks, _) = happy_mocks(user_id);

        mocks
            .code_source
            .expect_alphanumeric()
            .times(5)
            .returning(|len| "X".repeat(len));
        mocks
            .charge_repo
            .expect_insert_pending()
            .times(5)
            .returning(|_| Box::pin(async { Ok(ChargeInsertOutcome::CodeTaken) }));

        let err = usecase(mocks)
            .generate(
                user_id,
                GenerateChargeRequest {
                    payment_method: PaymentMethod::Pix,
                    amount: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ChargeError::CodeGenerationExhausted));
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn fails_without_active_subscription() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_current_active()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = ChargeUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(MockPlanRepository::new()),
            Arc::new(MockPaymentRepository::new()),
            Arc::new(MockChargeRepository::new()),
            Arc::new(clock()),
            Arc::new(MockCodeSource::new()),
            AuditTrail::disabled(),
        );

        let err = usecase
            .generate(
                Uuid::new_v4(),
                GenerateChargeRequest {
                    payment_method: PaymentMethod::Pix,
                    amount: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ChargeError::NoActiveSubscription));
    }
}
