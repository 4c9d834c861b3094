use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    #[default]
    Pending,
    Paid,
    Expired,
}

impl Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            ChargeStatus::Pending => "pending",
            ChargeStatus::Paid => "paid",
            ChargeStatus::Expired => "expired",
        };
        write!(f, "{}", status)
    }
}

impl ChargeStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "pending" => ChargeStatus::Pending,
            "paid" => ChargeStatus::Paid,
            _ => ChargeStatus::Expired,
        }
    }
}
