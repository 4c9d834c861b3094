use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;
use crate::domain::value_objects::enums::plan_tiers::PlanTier;
use crate::domain::value_objects::money;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDto {
    pub id: Uuid,
    pub name: String,
    pub tier: Option<PlanTier>,
    pub price: f64,
    pub duration_days: i64,
    pub is_active: bool,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            tier: PlanTier::from_str(&value.tier),
            price: money::from_minor(value.price_minor),
            duration_days: value.coverage_days(),
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub tier: PlanTier,
    pub price: f64,
    pub duration_days: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CreatePlanResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PlanStatusDto {
    pub plan_valid: bool,
    pub tier: Option<PlanTier>,
    pub plan_name: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub payment_approved: bool,
    pub coverage_deadline: Option<DateTime<Utc>>,
    pub message: String,
}

impl PlanStatusDto {
    pub fn without_subscription() -> Self {
        Self {
            plan_valid: false,
            tier: None,
            plan_name: None,
            starts_at: None,
            ends_at: None,
            payment_approved: false,
            coverage_deadline: None,
            message: "no subscription".to_string(),
        }
    }
}
