//! Configuration types for the analytics engine.
//!
//! Team policies are deserialized straight into [`crate::models::TeamPolicy`];
//! this module holds the engine-wide settings that are not part of any team's
//! policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DEFAULT_AT_RISK_FRACTION;
use crate::error::{EngineError, EngineResult};

/// Engine-wide analytics settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Members whose remaining balance is below this fraction of the yearly
    /// entitlement are counted as at risk.
    #[serde(default = "default_at_risk_fraction")]
    pub at_risk_fraction: Decimal,
}

fn default_at_risk_fraction() -> Decimal {
    DEFAULT_AT_RISK_FRACTION
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            at_risk_fraction: DEFAULT_AT_RISK_FRACTION,
        }
    }
}

impl EngineSettings {
    /// Checks that every setting is within its allowed range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.at_risk_fraction < Decimal::ZERO || self.at_risk_fraction > Decimal::ONE {
            return Err(EngineError::InvalidPolicy {
                field: "at_risk_fraction".to_string(),
                message: format!("{} is outside 0-1", self.at_risk_fraction),
            });
        }
        Ok(())
    }
}
