use clap::Args;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use worstof_core::performance::{compute_performance, rebase_basket, select_worst_of};

use super::common::{CertificateArgs, MarketArgs};

/// Arguments for per-underlying performance since strike
#[derive(Args)]
pub struct PerformanceArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,
}

/// Arguments for worst-of selection
#[derive(Args)]
pub struct WorstOfArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,
}

/// Arguments for base-100 rebasing
#[derive(Args)]
pub struct RebaseArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,
}

pub fn run_performance(args: PerformanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.certificate.resolve()?;
    let basket = args.market.load()?;
    let records = compute_performance(&basket, config.strike_date, &config.barrier)?;
    Ok(serde_json::to_value(records)?)
}

pub fn run_worst_of(args: WorstOfArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.certificate.resolve()?;
    let basket = args.market.load()?;
    let records = compute_performance(&basket, config.strike_date, &config.barrier)?;
    let worst = select_worst_of(&records)?;
    Ok(serde_json::json!({
        "result": {
            "worst_of": worst.underlying,
            "performance_pct": worst.performance_pct,
            "strike_price": worst.strike_price,
            "current_price": worst.current_price,
            "barrier_price": worst.barrier_price,
            "barrier_breached": worst.barrier_breached,
        }
    }))
}

/// One row per date, one column per underlying; blanks where a series has
/// no observation.
pub fn run_rebase(args: RebaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.certificate.resolve()?;
    let basket = args.market.load()?;
    let rebased = rebase_basket(&basket, config.strike_date)?;

    let mut rows: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    for series in &rebased {
        for point in &series.points {
            rows.entry(point.date.to_string())
                .or_default()
                .insert(series.underlying.clone(), Value::from(point.level));
        }
    }

    let table: Vec<Value> = rows
        .into_iter()
        .map(|(date, levels)| {
            let mut row = Map::new();
            row.insert("date".into(), Value::String(date));
            for series in &rebased {
                let level = levels.get(&series.underlying).cloned().unwrap_or(Value::Null);
                row.insert(series.underlying.clone(), level);
            }
            Value::Object(row)
        })
        .collect();
    Ok(Value::Array(table))
}
