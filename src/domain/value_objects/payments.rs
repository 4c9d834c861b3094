use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::enums::{
    payment_methods::PaymentMethod, payment_statuses::PaymentStatus,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterPaymentRequest {
    pub amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub charge_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentDto {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub paid_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub message: String,
}
