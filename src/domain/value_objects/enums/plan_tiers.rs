use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Ordered plan level. The derived ordering (Basic < Pro < Premium) is what
/// access-control middleware compares against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Basic,
    Pro,
    Premium,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Basic => "basic",
            PlanTier::Pro => "pro",
            PlanTier::Premium => "premium",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(PlanTier::Basic),
            "pro" => Some(PlanTier::Pro),
            "premium" => Some(PlanTier::Premium),
            _ => None,
        }
    }
}

impl Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(PlanTier::Basic < PlanTier::Pro);
        assert!(PlanTier::Pro < PlanTier::Premium);
    }

    #[test]
    fn round_trips_through_str() {
        for tier in [PlanTier::Basic, PlanTier::Pro, PlanTier::Premium] {
            assert_eq!(PlanTier::from_str(tier.as_str()), Some(tier));
        }
        assert_eq!(PlanTier::from_str("platinum"), None);
    }
}
