use clap::Args;
use serde_json::{Map, Value};

use worstof_core::analytics::{calibrate, correlation_matrix};
use worstof_core::performance::{compute_performance, select_worst_of};

use super::common::{CertificateArgs, MarketArgs};

/// Arguments for return calibration
#[derive(Args)]
pub struct CalibrateArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,

    /// Calibrate this underlying instead of the worst-of
    #[arg(long)]
    pub underlying: Option<String>,
}

/// Arguments for the return correlation matrix
#[derive(Args)]
pub struct CorrelationArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,
}

pub fn run_calibrate(args: CalibrateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.certificate.resolve()?;
    let basket = args.market.load()?;

    let name = match args.underlying {
        Some(name) => name,
        None => {
            let records = compute_performance(&basket, config.strike_date, &config.barrier)?;
            select_worst_of(&records)?.underlying.clone()
        }
    };
    let series = basket.get(&name)?.since(config.strike_date)?;
    let params = calibrate(&series)?;

    Ok(serde_json::json!({
        "result": {
            "underlying": params.underlying,
            "mu": params.mu,
            "sigma": params.sigma,
            "num_returns": params.num_returns,
            "annualized_volatility_pct": params.annualized_volatility_pct(),
        }
    }))
}

/// Rendered as rows so table and CSV output read like a matrix.
pub fn run_correlation(args: CorrelationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.certificate.resolve()?;
    let basket = args.market.load()?;
    let corr = correlation_matrix(&basket, config.strike_date)?;

    let rows: Vec<Value> = corr
        .underlyings
        .iter()
        .zip(&corr.matrix)
        .map(|(name, row)| {
            let mut obj = Map::new();
            obj.insert("underlying".into(), Value::String(name.clone()));
            for (other, c) in corr.underlyings.iter().zip(row) {
                obj.insert(other.clone(), Value::from((c * 100.0).round() / 100.0));
            }
            Value::Object(obj)
        })
        .collect();
    Ok(Value::Array(rows))
}
