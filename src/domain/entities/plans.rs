use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::plans;

pub const DEFAULT_COVERAGE_DAYS: i64 = 365;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub tier: String,
    pub price_minor: i32,
    pub duration_days: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanEntity {
    /// Coverage window length in days; a plan with no explicit duration
    /// covers one year.
    pub fn coverage_days(&self) -> i64 {
        self.duration_days
            .map(i64::from)
            .unwrap_or(DEFAULT_COVERAGE_DAYS)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct InsertPlanEntity {
    pub name: String,
    pub tier: String,
    pub price_minor: i32,
    pub duration_days: Option<i32>,
    pub is_active: bool,
}
