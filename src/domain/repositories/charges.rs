use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::charges::{ChargeEntity, InsertChargeEntity};
use crate::domain::value_objects::charges::ChargeInsertOutcome;

#[async_trait]
#[automock]
pub trait ChargeRepository {
    /// Inserts a pending charge. A unique-code collision surfaces as
    /// `ChargeInsertOutcome::CodeTaken`, never as a silent success.
    async fn insert_pending(&self, charge: InsertChargeEntity) -> Result<ChargeInsertOutcome>;

    async fn find_pending_by_code(
        &self,
        subscription_id: Uuid,
        code: &str,
    ) -> Result<Option<ChargeEntity>>;

    /// Latest pending charge for the subscription, by creation time.
    async fn find_latest_pending(&self, subscription_id: Uuid) -> Result<Option<ChargeEntity>>;
}
