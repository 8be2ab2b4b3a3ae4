use clap::Args;
use serde_json::Value;

use worstof_core::evaluation::{evaluate_certificate, simulate_worst_of};
use worstof_core::monte_carlo::terminal_statistics;

use super::common::{CertificateArgs, MarketArgs};

/// Arguments for worst-of path simulation
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,

    /// Include every simulated path instead of the first --sample-paths
    #[arg(long)]
    pub all_paths: bool,
}

/// Arguments for the full certificate evaluation
#[derive(Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.certificate.resolve()?;
    let basket = args.market.load()?;

    let run = simulate_worst_of(&basket, &config)?;
    let simulation = &run.simulation;
    let params = &run.calibration;
    let probability = &run.probability;
    let stats = terminal_statistics(&simulation.terminal_prices())?;

    let keep = if args.all_paths {
        simulation.paths.len()
    } else {
        config.sample_paths
    };
    let paths: Vec<&Vec<f64>> = simulation.paths.iter().take(keep).collect();

    Ok(serde_json::json!({
        "result": {
            "underlying": run.worst.underlying,
            "start_price": simulation.start_price,
            "horizon_days": simulation.horizon_days,
            "num_simulations": simulation.num_simulations(),
            "seed": simulation.seed,
            "mu": params.mu,
            "sigma": params.sigma,
            "annualized_volatility_pct": params.annualized_volatility_pct(),
            "barrier_price": probability.barrier_price,
            "paths_above": probability.paths_above,
            "probability_pct": probability.probability_pct,
            "terminal_statistics": stats,
            "paths": paths,
        }
    }))
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.certificate.resolve()?;
    let basket = args.market.load()?;
    let result = evaluate_certificate(&basket, &config)?;
    Ok(serde_json::to_value(result)?)
}
