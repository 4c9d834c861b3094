use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::payments::{NewPaymentEntity, PaymentEntity};

#[async_trait]
#[automock]
pub trait PaymentRepository {
    /// Most recent approved payment on the subscription, by `paid_at`.
    async fn find_latest_approved(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<PaymentEntity>>;

    async fn record_payment(&self, payment: NewPaymentEntity) -> Result<Uuid>;

    /// Inserts the payment and marks the charge paid (linking the new
    /// payment id) in one transaction.
    async fn record_payment_settling_charge(
        &self,
        payment: NewPaymentEntity,
        charge_id: Uuid,
    ) -> Result<Uuid>;
}
