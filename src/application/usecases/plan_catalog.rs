use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::plans::InsertPlanEntity,
    repositories::plans::PlanRepository,
    value_objects::enums::plan_tiers::PlanTier,
    value_objects::money,
    value_objects::plans::{CreatePlanRequest, PlanDto},
};

#[derive(Debug, Error)]
pub enum PlanCatalogError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("invalid plan price")]
    InvalidPrice,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanCatalogError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PlanCatalogError::PlanNotFound => StatusCode::NOT_FOUND,
            PlanCatalogError::InvalidPrice => StatusCode::BAD_REQUEST,
            PlanCatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PlanCatalogResult<T> = std::result::Result<T, PlanCatalogError>;

pub struct PlanCatalogUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
}

impl<P> PlanCatalogUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>) -> Self {
        Self { plan_repo }
    }

    pub async fn list_plans(&self) -> PlanCatalogResult<Vec<PlanDto>> {
        info!("plan_catalog: listing active plans");
        let plans = self.plan_repo.list_active_plans().await.map_err(|err| {
            error!(db_error = ?err, "plan_catalog: failed to list active plans");
            PlanCatalogError::Internal(err)
        })?;

        let plan_count = plans.len();
        info!(plan_count, "plan_catalog: active plans loaded");
        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    pub async fn get_plan(&self, plan_id: Uuid) -> PlanCatalogResult<PlanDto> {
        let plan = self
            .plan_repo
            .find_active_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "plan_catalog: failed to load plan");
                PlanCatalogError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%plan_id, "plan_catalog: plan not found or inactive");
                PlanCatalogError::PlanNotFound
            })?;

        Ok(PlanDto::from(plan))
    }

    pub async fn get_plan_by_tier(&self, tier: PlanTier) -> PlanCatalogResult<PlanDto> {
        let plan = self
            .plan_repo
            .find_active_by_tier(tier)
            .await
            .map_err(|err| {
                error!(%tier, db_error = ?err, "plan_catalog: failed to load plan by tier");
                PlanCatalogError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%tier, "plan_catalog: no active plan for tier");
                PlanCatalogError::PlanNotFound
            })?;

        Ok(PlanDto::from(plan))
    }

    pub async fn create_plan(&self, request: CreatePlanRequest) -> PlanCatalogResult<Uuid> {
        let price_minor = i32::try_from(money::to_minor(request.price)).map_err(|_| {
            warn!(price = request.price, "plan_catalog: plan price out of range");
            PlanCatalogError::InvalidPrice
        })?;
        if price_minor < 0 {
            warn!(price = request.price, "plan_catalog: negative plan price");
            return Err(PlanCatalogError::InvalidPrice);
        }

        let insert = InsertPlanEntity {
            name: request.name.clone(),
            tier: request.tier.to_string(),
            price_minor,
            duration_days: request.duration_days,
            is_active: true,
        };

        let plan_id = self.plan_repo.create(insert).await.map_err(|err| {
            error!(
                name = %request.name,
                tier = %request.tier,
                db_error = ?err,
                "plan_catalog: failed to create plan"
            );
            PlanCatalogError::Internal(err)
        })?;

        info!(%plan_id, tier = %request.tier, "plan_catalog: plan created");
        Ok(plan_id)
    }
}
