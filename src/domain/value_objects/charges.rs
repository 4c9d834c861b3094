use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::enums::{
    charge_statuses::ChargeStatus, payment_methods::PaymentMethod,
};

/// Result of attempting to persist a pending charge. The unique index on the
/// charge code turns a collision into `CodeTaken` instead of an opaque error
/// so the generator can retry with a fresh code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeInsertOutcome {
    Created(Uuid),
    CodeTaken,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChargeRequest {
    pub payment_method: PaymentMethod,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ChargeDto {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub code: String,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub due_at: DateTime<Utc>,
    pub status: ChargeStatus,
    pub instructions: String,
}
