mod catalog;
mod error;
mod financing;
mod types;
mod valuation;

pub use catalog::{FinancingPlan, PlanCatalog, PlanFilter};
pub use error::PricingError;
pub use financing::quote;
pub use types::{
    ConditionMultipliers, FinancingRequest, FinancingResult, ValuationConfig, ValuationRequest,
    ValuationResult, VehicleCondition,
};
pub use valuation::estimate;
