use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{
    payments::PaymentEntity, plans::PlanEntity, subscriptions::SubscriptionEntity,
};

/// Paid-for window of a subscription: the plan's coverage days counted from
/// the last approved payment, or from the subscription start when nothing has
/// been approved yet. Shared by charge generation, payment registration, and
/// the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageWindow {
    pub reference_date: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub has_approved_payment: bool,
}

impl CoverageWindow {
    pub fn compute(
        subscription: &SubscriptionEntity,
        plan: &PlanEntity,
        last_approved_payment: Option<&PaymentEntity>,
    ) -> Self {
        let reference_date = last_approved_payment
            .map(|payment| payment.paid_at)
            .unwrap_or(subscription.starts_at);

        Self {
            reference_date,
            deadline: reference_date + Duration::days(plan.coverage_days()),
            has_approved_payment: last_approved_payment.is_some(),
        }
    }

    /// The deadline instant itself still counts as covered.
    pub fn covers(&self, now: DateTime<Utc>) -> bool {
        self.has_approved_payment && now <= self.deadline
    }
}
