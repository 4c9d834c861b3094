use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::charges;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = charges)]
pub struct ChargeEntity {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub payment_method: String,
    pub amount_minor: i32,
    pub code: String,
    pub due_at: DateTime<Utc>,
    pub status: String,
    pub payment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = charges)]
pub struct InsertChargeEntity {
    pub subscription_id: Uuid,
    pub payment_method: String,
    pub amount_minor: i32,
    pub code: String,
    pub due_at: DateTime<Utc>,
    pub status: String,
}
