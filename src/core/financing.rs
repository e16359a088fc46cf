use super::catalog::PlanCatalog;
use super::error::PricingError;
use super::types::{FinancingRequest, FinancingResult};

pub fn quote(
    request: &FinancingRequest,
    catalog: &PlanCatalog,
) -> Result<FinancingResult, PricingError> {
    let plan = catalog
        .find(&request.plan_id)
        .ok_or_else(|| PricingError::PlanNotFound {
            plan_id: request.plan_id.clone(),
        })?;

    if !request.vehicle_price.is_finite() || request.vehicle_price <= 0.0 {
        return Err(PricingError::InvalidInput {
            field: "vehiclePrice",
            reason: "must be a finite value > 0".to_string(),
        });
    }
    if !request.down_payment.is_finite() || request.down_payment < 0.0 {
        return Err(PricingError::InvalidInput {
            field: "downPayment",
            reason: "must be a finite value >= 0".to_string(),
        });
    }
    if request.down_payment > request.vehicle_price {
        return Err(PricingError::InvalidInput {
            field: "downPayment",
            reason: "cannot exceed the vehicle price".to_string(),
        });
    }
    if request.vehicle_price < plan.min_financeable_amount
        || request.vehicle_price > plan.max_financeable_amount
    {
        return Err(PricingError::AmountOutOfRange {
            price: request.vehicle_price,
            min: plan.min_financeable_amount,
            max: plan.max_financeable_amount,
        });
    }
    let required_down = request.vehicle_price * (plan.min_down_payment_percent / 100.0);
    if request.down_payment < required_down {
        return Err(PricingError::DownPaymentTooLow {
            down_payment: request.down_payment,
            required: required_down,
            percent: plan.min_down_payment_percent,
        });
    }

    let financed_amount = request.vehicle_price - request.down_payment;
    let installments = f64::from(plan.installment_count);
    let rate = plan.monthly_rate_percent / 100.0;

    let (monthly_installment, total_payable, total_interest) = if rate == 0.0 {
        (financed_amount / installments, financed_amount, 0.0)
    } else {
        let growth = (1.0 + rate).powi(plan.installment_count as i32);
        let monthly = financed_amount * (rate * growth) / (growth - 1.0);
        let total = monthly * installments;
        (monthly, total, total - financed_amount)
    };

    // The three outputs round independently; the sub-unit drift between
    // total_payable and monthly_installment * n is accepted.
    Ok(FinancingResult {
        plan_id: plan.id.clone(),
        plan_label: plan.label.clone(),
        vehicle_price: request.vehicle_price,
        down_payment: request.down_payment,
        financed_amount,
        installment_count: plan.installment_count,
        monthly_installment: monthly_installment.round() as i64,
        total_payable: total_payable.round() as i64,
        total_interest: total_interest.round() as i64,
        annual_rate_percent: plan.annual_rate_percent,
        monthly_rate_percent: plan.monthly_rate_percent,
    })
}
