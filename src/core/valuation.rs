use super::error::PricingError;
use super::types::{ValuationConfig, ValuationRequest, ValuationResult};

pub fn estimate(
    request: &ValuationRequest,
    current_year: i32,
    config: &ValuationConfig,
) -> Result<ValuationResult, PricingError> {
    if request.model_year < config.min_model_year || request.model_year > current_year + 1 {
        return Err(PricingError::InvalidInput {
            field: "modelYear",
            reason: format!(
                "must be between {} and {}",
                config.min_model_year,
                current_year + 1
            ),
        });
    }
    if !request.mileage_km.is_finite() || request.mileage_km < 0.0 {
        return Err(PricingError::InvalidInput {
            field: "mileageKm",
            reason: "must be a finite value >= 0".to_string(),
        });
    }

    // years_in_use is -1 for next-model-year vehicles; the range check above
    // is the only gate on age.
    let years_in_use = current_year - request.model_year;
    let total_age_depreciation = f64::from(years_in_use) * config.annual_depreciation;
    let mileage_depreciation =
        request.mileage_km / 10_000.0 * config.mileage_depreciation_per_10k_km;
    let condition_multiplier = config.multipliers.for_condition(request.condition);

    // Intermediate terms stay full precision; rounding happens once at the end.
    let raw =
        (config.base_value - total_age_depreciation - mileage_depreciation) * condition_multiplier;
    let estimated_value = raw.max(config.floor_value).round() as i64;

    Ok(ValuationResult {
        estimated_value,
        base_value: config.base_value,
        years_in_use,
        annual_depreciation: config.annual_depreciation,
        total_age_depreciation,
        mileage_depreciation,
        condition_multiplier,
    })
}
