use std::str::FromStr;

use serde::Serialize;

use super::error::PricingError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VehicleCondition {
    Excellent,
    VeryGood,
    Good,
    Fair,
}

impl FromStr for VehicleCondition {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "excellent" => Ok(Self::Excellent),
            "very-good" | "verygood" => Ok(Self::VeryGood),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            _ => Err(PricingError::InvalidInput {
                field: "condition",
                reason: format!(
                    "unrecognized condition `{s}`; expected one of excellent, very-good, good, fair"
                ),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValuationRequest {
    pub brand: String,
    pub model: String,
    pub model_year: i32,
    pub mileage_km: f64,
    pub condition: VehicleCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub estimated_value: i64,
    pub base_value: f64,
    pub years_in_use: i32,
    pub annual_depreciation: f64,
    pub total_age_depreciation: f64,
    pub mileage_depreciation: f64,
    pub condition_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionMultipliers {
    pub excellent: f64,
    pub very_good: f64,
    pub good: f64,
    pub fair: f64,
}

impl ConditionMultipliers {
    pub fn for_condition(self, condition: VehicleCondition) -> f64 {
        match condition {
            VehicleCondition::Excellent => self.excellent,
            VehicleCondition::VeryGood => self.very_good,
            VehicleCondition::Good => self.good,
            VehicleCondition::Fair => self.fair,
        }
    }
}

/// Economic assumptions behind the valuation estimate, in currency units.
/// Callers inject alternatives without touching the algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationConfig {
    pub base_value: f64,
    pub annual_depreciation: f64,
    pub mileage_depreciation_per_10k_km: f64,
    pub floor_value: f64,
    pub min_model_year: i32,
    pub multipliers: ConditionMultipliers,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            base_value: 8_000_000.0,
            annual_depreciation: 400_000.0,
            mileage_depreciation_per_10k_km: 80_000.0,
            floor_value: 500_000.0,
            min_model_year: 1990,
            multipliers: ConditionMultipliers {
                excellent: 1.15,
                very_good: 1.0,
                good: 0.85,
                fair: 0.65,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FinancingRequest {
    pub plan_id: String,
    pub vehicle_price: f64,
    pub down_payment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingResult {
    pub plan_id: String,
    pub plan_label: String,
    pub vehicle_price: f64,
    pub down_payment: f64,
    pub financed_amount: f64,
    pub installment_count: u32,
    pub monthly_installment: i64,
    pub total_payable: i64,
    pub total_interest: i64,
    pub annual_rate_percent: f64,
    pub monthly_rate_percent: f64,
}
