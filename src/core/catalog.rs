use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingPlan {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub installment_count: u32,
    pub annual_rate_percent: f64,
    pub monthly_rate_percent: f64,
    pub min_down_payment_percent: f64,
    pub min_financeable_amount: f64,
    pub max_financeable_amount: f64,
    #[serde(default)]
    pub highlighted: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanFilter {
    pub highlighted_only: bool,
    pub max_installments: Option<u32>,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanCatalog {
    plans: Vec<FinancingPlan>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<FinancingPlan>) -> Result<Self, String> {
        for plan in &plans {
            validate_plan(plan)?;
        }
        for (i, plan) in plans.iter().enumerate() {
            if plans[..i].iter().any(|other| other.id == plan.id) {
                return Err(format!("duplicate plan id `{}`", plan.id));
            }
        }
        Ok(Self { plans })
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        let plans: Vec<FinancingPlan> =
            serde_json::from_str(raw).map_err(|e| format!("invalid plan catalog JSON: {e}"))?;
        Self::new(plans)
    }

    pub fn find(&self, plan_id: &str) -> Option<&FinancingPlan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }

    pub fn plans(&self) -> &[FinancingPlan] {
        &self.plans
    }

    pub fn filtered(&self, filter: PlanFilter) -> Vec<&FinancingPlan> {
        self.plans
            .iter()
            .filter(|plan| !filter.highlighted_only || plan.highlighted)
            .filter(|plan| {
                filter
                    .max_installments
                    .map_or(true, |max| plan.installment_count <= max)
            })
            .filter(|plan| {
                filter.amount.map_or(true, |amount| {
                    plan.min_financeable_amount <= amount && amount <= plan.max_financeable_amount
                })
            })
            .collect()
    }
}

fn validate_plan(plan: &FinancingPlan) -> Result<(), String> {
    if plan.id.is_empty() {
        return Err("plan id must not be empty".to_string());
    }
    if plan.installment_count == 0 {
        return Err(format!("plan `{}`: installmentCount must be > 0", plan.id));
    }
    if !plan.monthly_rate_percent.is_finite() || plan.monthly_rate_percent < 0.0 {
        return Err(format!(
            "plan `{}`: monthlyRatePercent must be >= 0",
            plan.id
        ));
    }
    if !(0.0..=100.0).contains(&plan.min_down_payment_percent) {
        return Err(format!(
            "plan `{}`: minDownPaymentPercent must be between 0 and 100",
            plan.id
        ));
    }
    if !plan.min_financeable_amount.is_finite()
        || !plan.max_financeable_amount.is_finite()
        || plan.min_financeable_amount < 0.0
        || plan.max_financeable_amount < plan.min_financeable_amount
    {
        return Err(format!(
            "plan `{}`: financeable amounts must satisfy 0 <= min <= max",
            plan.id
        ));
    }
    Ok(())
}

impl Default for PlanCatalog {
    fn default() -> Self {
        let plans = vec![
            FinancingPlan {
                id: "plan-a".to_string(),
                label: "12 Installments, Interest Free".to_string(),
                description: "Ideal for quick purchases. Pay the vehicle in 12 fixed installments with no interest.".to_string(),
                installment_count: 12,
                annual_rate_percent: 0.0,
                monthly_rate_percent: 0.0,
                min_down_payment_percent: 20.0,
                min_financeable_amount: 5_000_000.0,
                max_financeable_amount: 15_000_000.0,
                highlighted: true,
            },
            FinancingPlan {
                id: "plan-b".to_string(),
                label: "24 Installments, Promotional Rate".to_string(),
                description: "Promotional 5% annual rate. Finance without straining the monthly budget.".to_string(),
                installment_count: 24,
                annual_rate_percent: 5.0,
                monthly_rate_percent: 0.42,
                min_down_payment_percent: 15.0,
                min_financeable_amount: 3_000_000.0,
                max_financeable_amount: 20_000_000.0,
                highlighted: true,
            },
            FinancingPlan {
                id: "plan-c".to_string(),
                label: "36 Installments, Extended".to_string(),
                description: "Long-term financing with lower installments at an 8% annual rate.".to_string(),
                installment_count: 36,
                annual_rate_percent: 8.0,
                monthly_rate_percent: 0.67,
                min_down_payment_percent: 10.0,
                min_financeable_amount: 2_000_000.0,
                max_financeable_amount: 25_000_000.0,
                highlighted: false,
            },
            FinancingPlan {
                id: "plan-100".to_string(),
                label: "100% Financing".to_string(),
                description: "No down payment. Finances the full vehicle value in up to 48 installments.".to_string(),
                installment_count: 48,
                annual_rate_percent: 12.0,
                monthly_rate_percent: 1.0,
                min_down_payment_percent: 0.0,
                min_financeable_amount: 4_000_000.0,
                max_financeable_amount: 18_000_000.0,
                highlighted: true,
            },
            FinancingPlan {
                id: "plan-corporativo".to_string(),
                label: "Corporate Plan".to_string(),
                description: "For companies and the self-employed, with preferential terms.".to_string(),
                installment_count: 24,
                annual_rate_percent: 3.0,
                monthly_rate_percent: 0.25,
                min_down_payment_percent: 25.0,
                min_financeable_amount: 10_000_000.0,
                max_financeable_amount: 50_000_000.0,
                highlighted: false,
            },
        ];
        Self { plans }
    }
}
