use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub amount_minor: i32,
    pub status: String,
    pub payment_method: Option<String>,
    pub paid_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentEntity {
    pub subscription_id: Uuid,
    pub amount_minor: i32,
    pub status: String,
    pub payment_method: Option<String>,
    pub paid_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
}
