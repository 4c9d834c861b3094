use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity};
use crate::domain::value_objects::enums::plan_tiers::PlanTier;

#[async_trait]
#[automock]
pub trait PlanRepository {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;

    async fn find_active_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;

    async fn find_active_by_tier(&self, tier: PlanTier) -> Result<Option<PlanEntity>>;

    /// Active plans only, cheapest first.
    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>>;

    async fn create(&self, plan: InsertPlanEntity) -> Result<Uuid>;
}
