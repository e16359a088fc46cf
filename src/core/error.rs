use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("financing plan not found: {plan_id}")]
    PlanNotFound { plan_id: String },

    #[error("vehicle price {price} is outside the financeable range {min} to {max}")]
    AmountOutOfRange { price: f64, min: f64, max: f64 },

    #[error(
        "down payment {down_payment} is below the plan minimum {required} ({percent}% of the vehicle price)"
    )]
    DownPaymentTooLow {
        down_payment: f64,
        required: f64,
        percent: f64,
    },
}
