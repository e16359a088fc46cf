use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::{
    FinancingRequest, FinancingResult, PlanCatalog, PlanFilter, PricingError, ValuationConfig,
    ValuationRequest, ValuationResult, VehicleCondition, estimate, quote,
};

#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub valuation: ValuationConfig,
    pub catalog: PlanCatalog,
}

type SharedState = Arc<EngineState>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValuationPayload {
    brand: String,
    model: String,
    #[serde(alias = "modelYear")]
    year: i32,
    mileage_km: f64,
    condition: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlansQuery {
    highlighted_only: Option<bool>,
    max_installments: Option<u32>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotePayload {
    vehicle_price: f64,
    #[serde(default)]
    down_payment: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16, state: EngineState) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/valuation", post(valuation_handler))
        .route("/api/plans", get(plans_handler))
        .route("/api/plans/:plan_id/quote", post(quote_handler))
        .fallback(not_found_handler)
        .with_state(Arc::new(state));

    let listener = TcpListener::bind(addr).await?;
    println!("cotizador HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn valuation_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ValuationPayload>,
) -> Response {
    let vehicle = format!("{} {} {}", payload.brand, payload.model, payload.year);
    match evaluate_valuation(&state, &payload, current_year()) {
        Ok(result) => {
            log::info!("valuation for {vehicle}: {}", result.estimated_value);
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(status_for(&err), &err.to_string()),
    }
}

async fn plans_handler(State(state): State<SharedState>, Query(query): Query<PlansQuery>) -> Response {
    let filter = PlanFilter {
        highlighted_only: query.highlighted_only.unwrap_or(false),
        max_installments: query.max_installments,
        amount: query.amount,
    };
    json_response(StatusCode::OK, state.catalog.filtered(filter))
}

async fn quote_handler(
    State(state): State<SharedState>,
    Path(plan_id): Path<String>,
    Json(payload): Json<QuotePayload>,
) -> Response {
    match evaluate_quote(&state, plan_id, &payload) {
        Ok(result) => {
            log::info!(
                "quote for {}: {} installments of {}",
                result.plan_id,
                result.installment_count,
                result.monthly_installment
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(status_for(&err), &err.to_string()),
    }
}

fn evaluate_valuation(
    state: &EngineState,
    payload: &ValuationPayload,
    current_year: i32,
) -> Result<ValuationResult, PricingError> {
    let condition = payload.condition.parse::<VehicleCondition>()?;
    let request = ValuationRequest {
        brand: payload.brand.clone(),
        model: payload.model.clone(),
        model_year: payload.year,
        mileage_km: payload.mileage_km,
        condition,
    };
    estimate(&request, current_year, &state.valuation)
}

fn evaluate_quote(
    state: &EngineState,
    plan_id: String,
    payload: &QuotePayload,
) -> Result<FinancingResult, PricingError> {
    let request = FinancingRequest {
        plan_id,
        vehicle_price: payload.vehicle_price,
        down_payment: payload.down_payment,
    };
    quote(&request, &state.catalog)
}

fn current_year() -> i32 {
    Utc::now().year()
}

fn status_for(err: &PricingError) -> StatusCode {
    match err {
        PricingError::PlanNotFound { .. } => StatusCode::NOT_FOUND,
        PricingError::InvalidInput { .. }
        | PricingError::AmountOutOfRange { .. }
        | PricingError::DownPaymentTooLow { .. } => StatusCode::BAD_REQUEST,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_YEAR: i32 = 2030;

    fn state() -> EngineState {
        EngineState::default()
    }

    fn valuation_payload_from_json(json: &str) -> ValuationPayload {
        serde_json::from_str(json).expect("payload should parse")
    }

    #[test]
    fn valuation_payload_accepts_both_year_spellings() {
        let by_year = valuation_payload_from_json(
            r#"{"brand":"Fiat","model":"Cronos","year":2028,"mileageKm":12000,"condition":"good"}"#,
        );
        assert_eq!(by_year.year, 2028);
        assert_eq!(by_year.mileage_km, 12_000.0);

        let by_model_year = valuation_payload_from_json(
            r#"{"brand":"Fiat","model":"Cronos","modelYear":2027,"mileageKm":0,"condition":"fair"}"#,
        );
        assert_eq!(by_model_year.year, 2027);
    }

    #[test]
    fn evaluate_valuation_runs_the_estimator() {
        let payload = valuation_payload_from_json(
            r#"{"brand":"Fiat","model":"Cronos","year":2030,"mileageKm":0,"condition":"very-good"}"#,
        );
        let result =
            evaluate_valuation(&state(), &payload, TEST_YEAR).expect("payload is valid");
        assert_eq!(result.estimated_value, 8_000_000);
    }

    #[test]
    fn evaluate_valuation_rejects_unknown_conditions() {
        let payload = valuation_payload_from_json(
            r#"{"brand":"Fiat","model":"Cronos","year":2030,"mileageKm":0,"condition":"mint"}"#,
        );
        let err = evaluate_valuation(&state(), &payload, TEST_YEAR)
            .expect_err("unknown condition must be rejected");
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn evaluate_quote_defaults_the_down_payment_to_zero() {
        let payload: QuotePayload =
            serde_json::from_str(r#"{"vehiclePrice":5000000}"#).expect("payload should parse");
        assert_eq!(payload.down_payment, 0.0);

        let result = evaluate_quote(&state(), "plan-100".to_string(), &payload)
            .expect("plan-100 takes zero down");
        assert_eq!(result.financed_amount, 5_000_000.0);
    }

    #[test]
    fn unknown_plan_maps_to_not_found() {
        let payload: QuotePayload =
            serde_json::from_str(r#"{"vehiclePrice":5000000,"downPayment":1000000}"#)
                .expect("payload should parse");
        let err = evaluate_quote(&state(), "plan-z".to_string(), &payload)
            .expect_err("unknown plan must be rejected");
        assert_eq!(status_for(&err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_errors_map_to_bad_request() {
        for err in [
            PricingError::InvalidInput {
                field: "vehiclePrice",
                reason: "must be a finite value > 0".to_string(),
            },
            PricingError::AmountOutOfRange {
                price: 1.0,
                min: 2.0,
                max: 3.0,
            },
            PricingError::DownPaymentTooLow {
                down_payment: 1.0,
                required: 2.0,
                percent: 10.0,
            },
        ] {
            assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn valuation_result_serializes_with_camel_case_keys() {
        let payload = valuation_payload_from_json(
            r#"{"brand":"Fiat","model":"Cronos","year":2025,"mileageKm":42000,"condition":"good"}"#,
        );
        let result =
            evaluate_valuation(&state(), &payload, TEST_YEAR).expect("payload is valid");
        let json = serde_json::to_string(&result).expect("result should serialize");
        for key in [
            "\"estimatedValue\"",
            "\"baseValue\"",
            "\"yearsInUse\"",
            "\"annualDepreciation\"",
            "\"totalAgeDepreciation\"",
            "\"mileageDepreciation\"",
            "\"conditionMultiplier\"",
        ] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }

    #[test]
    fn financing_result_serializes_with_camel_case_keys() {
        let payload: QuotePayload =
            serde_json::from_str(r#"{"vehiclePrice":10000000,"downPayment":1500000}"#)
                .expect("payload should parse");
        let result = evaluate_quote(&state(), "plan-b".to_string(), &payload)
            .expect("payload is valid");
        let json = serde_json::to_string(&result).expect("result should serialize");
        for key in [
            "\"planId\"",
            "\"planLabel\"",
            "\"vehiclePrice\"",
            "\"downPayment\"",
            "\"financedAmount\"",
            "\"installmentCount\"",
            "\"monthlyInstallment\"",
            "\"totalPayable\"",
            "\"totalInterest\"",
            "\"annualRatePercent\"",
            "\"monthlyRatePercent\"",
        ] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }

    #[test]
    fn plans_query_maps_onto_the_catalog_filter() {
        let query = PlansQuery {
            highlighted_only: Some(true),
            max_installments: Some(24),
            amount: Some(10_000_000.0),
        };
        let filter = PlanFilter {
            highlighted_only: query.highlighted_only.unwrap_or(false),
            max_installments: query.max_installments,
            amount: query.amount,
        };
        let state = state();
        let ids: Vec<&str> = state
            .catalog
            .filtered(filter)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["plan-a", "plan-b"]);
    }

    #[test]
    fn error_payload_carries_a_human_readable_message() {
        let err = PricingError::DownPaymentTooLow {
            down_payment: 1_000_000.0,
            required: 1_500_000.0,
            percent: 15.0,
        };
        let body = ErrorResponse {
            error: err.to_string(),
        };
        let json = serde_json::to_string(&body).expect("body should serialize");
        assert!(json.contains("\"error\""));
        assert!(json.contains("1500000"));
        assert!(json.contains("15%"));
    }
}
