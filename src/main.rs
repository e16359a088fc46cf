use std::path::PathBuf;
use std::process;

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use cotizador::api::{EngineState, run_http_server};
use cotizador::core::{
    FinancingRequest, PlanCatalog, PlanFilter, ValuationConfig, ValuationRequest,
    VehicleCondition, estimate, quote,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCondition {
    Excellent,
    VeryGood,
    Good,
    Fair,
}

impl From<CliCondition> for VehicleCondition {
    fn from(value: CliCondition) -> Self {
        match value {
            CliCondition::Excellent => VehicleCondition::Excellent,
            CliCondition::VeryGood => VehicleCondition::VeryGood,
            CliCondition::Good => VehicleCondition::Good,
            CliCondition::Fair => VehicleCondition::Fair,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "cotizador",
    about = "Dealership pricing engine: used-vehicle valuations and installment quotes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(
            long,
            help = "JSON file with the financing plan catalog; defaults to the built-in plans"
        )]
        plans: Option<PathBuf>,
    },
    /// Estimate the resale value of a used vehicle
    Value {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        model_year: i32,
        #[arg(long, default_value_t = 0.0)]
        mileage_km: f64,
        #[arg(long, value_enum)]
        condition: CliCondition,
        #[arg(long, help = "Reference year; defaults to the current calendar year")]
        current_year: Option<i32>,
    },
    /// Quote the monthly installment for a financing plan
    Quote {
        #[arg(long)]
        plan: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0.0)]
        down_payment: f64,
    },
    /// List the financing plan catalog
    Plans {
        #[arg(long)]
        highlighted_only: bool,
        #[arg(long)]
        max_installments: Option<u32>,
        #[arg(long)]
        amount: Option<f64>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, plans } => {
            let catalog = match load_catalog(plans.as_deref()) {
                Ok(catalog) => catalog,
                Err(msg) => fail(&msg),
            };
            let state = EngineState {
                valuation: ValuationConfig::default(),
                catalog,
            };
            if let Err(e) = run_http_server(port, state).await {
                fail(&format!("Server error: {e}"));
            }
        }
        Command::Value {
            brand,
            model,
            model_year,
            mileage_km,
            condition,
            current_year,
        } => {
            let request = ValuationRequest {
                brand,
                model,
                model_year,
                mileage_km,
                condition: condition.into(),
            };
            let year = current_year.unwrap_or_else(|| Utc::now().year());
            match estimate(&request, year, &ValuationConfig::default()) {
                Ok(result) => print_json(&result),
                Err(err) => fail(&err.to_string()),
            }
        }
        Command::Quote {
            plan,
            price,
            down_payment,
        } => {
            let request = FinancingRequest {
                plan_id: plan,
                vehicle_price: price,
                down_payment,
            };
            match quote(&request, &PlanCatalog::default()) {
                Ok(result) => print_json(&result),
                Err(err) => fail(&err.to_string()),
            }
        }
        Command::Plans {
            highlighted_only,
            max_installments,
            amount,
        } => {
            let catalog = PlanCatalog::default();
            let filter = PlanFilter {
                highlighted_only,
                max_installments,
                amount,
            };
            print_json(&catalog.filtered(filter));
        }
    }
}

fn load_catalog(path: Option<&std::path::Path>) -> Result<PlanCatalog, String> {
    match path {
        None => Ok(PlanCatalog::default()),
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            PlanCatalog::from_json(&raw)
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(&format!("failed to serialize result: {e}")),
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}
