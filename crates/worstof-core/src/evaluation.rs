//! End-to-end evaluation of a worst-of barrier certificate.
//!
//! Stages run in a fixed order (configuration, performance, worst-of
//! selection, calibration, simulation, barrier probability, payoff) and the
//! first failure aborts the whole run. The correlation matrix is a report
//! extra: too little overlapping history leaves it out with a warning.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analytics::{calibrate, correlation_matrix, CalibratedParams, CorrelationMatrix};
use crate::config::{BarrierConfig, BarrierReference, CertificateConfig};
use crate::error::WorstOfError;
use crate::market::Basket;
use crate::monte_carlo::{
    barrier_probability, simulate_paths, terminal_statistics, BarrierProbability,
    SimulationResult, TerminalStatistics,
};
use crate::payoff::{payoff_curve, redemption_at, PayoffCurve};
use crate::performance::{
    compute_performance, rebase_basket, select_worst_of, PerformanceRecord, RebasedSeries,
};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::WorstOfResult;

/// Everything the presentation layer needs for one certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub performance: Vec<PerformanceRecord>,
    pub worst_of: String,
    pub worst_of_performance_pct: f64,
    pub calibration: CalibratedParams,
    pub annualized_volatility_pct: f64,
    pub barrier_reference: BarrierReference,
    pub barrier_probability: BarrierProbability,
    pub terminal_statistics: TerminalStatistics,
    /// First `sample_paths` simulated paths, for charting.
    pub sample_paths: Vec<Vec<f64>>,
    pub payoff: PayoffCurve,
    /// Redemption if the certificate matured at today's worst-of level.
    pub indicative_redemption: Money,
    /// Average redemption over simulated terminal prices, undiscounted.
    pub expected_redemption: Money,
    /// Present when the basket has more than one underlying and enough
    /// common dates.
    pub correlation: Option<CorrelationMatrix>,
    pub rebased: Vec<RebasedSeries>,
}

/// Performance through barrier probability for the worst-of underlying.
#[derive(Debug, Clone)]
pub struct WorstOfSimulation {
    pub performance: Vec<PerformanceRecord>,
    pub worst: PerformanceRecord,
    pub calibration: CalibratedParams,
    pub simulation: SimulationResult,
    pub probability: BarrierProbability,
}

/// Select the worst-of, calibrate it from the strike date and simulate it
/// under `config`, then measure the barrier probability.
pub fn simulate_worst_of(
    basket: &Basket,
    config: &CertificateConfig,
) -> WorstOfResult<WorstOfSimulation> {
    config.validate()?;

    let performance = compute_performance(basket, config.strike_date, &config.barrier)?;
    let worst = select_worst_of(&performance)?.clone();
    let worst_series = basket.get(&worst.underlying)?.since(config.strike_date)?;
    let calibration = calibrate(&worst_series)?;
    let simulation = simulate_paths(worst.current_price, &calibration, &config.simulation)?;

    let barrier_price = match config.barrier_reference {
        BarrierReference::SimulationStart => config.barrier.barrier_price(simulation.start_price)?,
        BarrierReference::Strike => worst.barrier_price,
    };
    let probability = barrier_probability(&simulation, barrier_price)?;

    Ok(WorstOfSimulation {
        performance,
        worst,
        calibration,
        simulation,
        probability,
    })
}

/// Run the full pipeline for `basket` under `config`.
pub fn evaluate_certificate(
    basket: &Basket,
    config: &CertificateConfig,
) -> WorstOfResult<ComputationOutput<EvaluationReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let WorstOfSimulation {
        performance,
        worst,
        calibration,
        simulation,
        probability,
    } = simulate_worst_of(basket, config)?;

    for r in performance.iter().filter(|r| r.barrier_breached) {
        warnings.push(format!(
            "{} is below its barrier ({:.4} < {:.4})",
            r.underlying, r.current_price, r.barrier_price
        ));
    }
    if calibration.sigma == 0.0 {
        warnings.push(format!(
            "{} has zero historical volatility; simulated paths are deterministic",
            worst.underlying
        ));
    }
    let non_positive = simulation.non_positive_paths();
    if non_positive > 0 {
        warnings.push(format!(
            "{non_positive} of {} simulated paths reached a non-positive price \
             (daily return below -100% under arithmetic compounding)",
            simulation.num_simulations()
        ));
    }

    let terminals = simulation.terminal_prices();
    let terminal_stats = terminal_statistics(&terminals)?;

    let payoff = payoff_curve(&config.barrier, &config.payoff_domain)?;
    let indicative_redemption =
        redemption_for_price(&config.barrier, worst.strike_price, worst.current_price)?;
    let expected_redemption =
        expected_redemption(&config.barrier, worst.strike_price, &terminals)?;

    let correlation = if basket.len() > 1 {
        match correlation_matrix(basket, config.strike_date) {
            Ok(matrix) => Some(matrix),
            Err(e @ WorstOfError::InsufficientData { .. }) => {
                warnings.push(format!("correlation matrix omitted: {e}"));
                None
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };
    let rebased = rebase_basket(basket, config.strike_date)?;

    for w in &warnings {
        tracing::warn!("{w}");
    }
    tracing::info!(
        worst_of = %worst.underlying,
        performance_pct = worst.performance_pct,
        probability_pct = probability.probability_pct,
        "certificate evaluated"
    );

    let sample_paths = sample_of(&simulation, config.sample_paths);
    let annualized_volatility_pct = calibration.annualized_volatility_pct();
    let report = EvaluationReport {
        worst_of_performance_pct: worst.performance_pct,
        worst_of: worst.underlying,
        performance,
        calibration,
        annualized_volatility_pct,
        barrier_reference: config.barrier_reference,
        barrier_probability: probability,
        terminal_statistics: terminal_stats,
        sample_paths,
        payoff,
        indicative_redemption,
        expected_redemption,
        correlation,
        rebased,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Worst-of barrier certificate: Monte Carlo on Normal daily returns, arithmetic compounding",
        &serde_json::json!({
            "barrier_level": config.barrier.barrier_level,
            "notional": config.barrier.notional,
            "strike_date": config.strike_date,
            "num_simulations": config.simulation.num_simulations,
            "horizon_days": config.simulation.horizon_days,
            "seed": config.simulation.seed,
            "barrier_reference": config.barrier_reference,
            "correlation_modelled": false,
            "discounting": false,
        }),
        warnings,
        elapsed,
        report,
    ))
}

fn sample_of(simulation: &SimulationResult, count: usize) -> Vec<Vec<f64>> {
    simulation.paths.iter().take(count).cloned().collect()
}

/// Payoff rule applied to the performance of `price` against `strike`.
///
/// Performance is floored at -100%: a non-positive simulated price redeems
/// nothing rather than a negative amount. Anything above the protection
/// threshold redeems the notional without a decimal conversion, so runaway
/// simulated prices never leave the `f64` domain.
fn redemption_for_price(barrier: &BarrierConfig, strike: f64, price: f64) -> WorstOfResult<Money> {
    let performance = ((price - strike) / strike * 100.0).max(-100.0);
    let threshold = barrier.protection_threshold().to_f64().unwrap_or(0.0);
    if performance > threshold {
        return Ok(barrier.notional.round_dp(2));
    }
    let performance = Decimal::from_f64(performance).ok_or_else(|| {
        WorstOfError::invalid_config(
            "performance",
            format!("{performance} is not representable as a decimal"),
        )
    })?;
    Ok(redemption_at(barrier, performance).round_dp(2))
}

fn expected_redemption(
    barrier: &BarrierConfig,
    strike: f64,
    terminals: &[f64],
) -> WorstOfResult<Money> {
    if terminals.is_empty() {
        return Err(WorstOfError::insufficient("simulated paths", 1, 0));
    }
    let mut total = dec!(0);
    for &t in terminals {
        total += redemption_for_price(barrier, strike, t)?;
    }
    Ok((total / Decimal::from(terminals.len())).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::market::PriceSeries;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn basket() -> Basket {
        let a = PriceSeries::from_pairs(
            "GENERALI",
            vec![(d(2), 20.0), (d(3), 20.4), (d(4), 20.2), (d(5), 21.0)],
        )
        .unwrap();
        let b = PriceSeries::from_pairs(
            "TENARIS",
            vec![(d(2), 17.0), (d(3), 16.1), (d(4), 15.8), (d(5), 15.0)],
        )
        .unwrap();
        Basket::new(vec![a, b]).unwrap()
    }

    fn config() -> CertificateConfig {
        CertificateConfig {
            simulation: SimulationConfig {
                num_simulations: 200,
                horizon_days: 20,
                seed: Some(42),
            },
            ..CertificateConfig::default()
        }
    }

    #[test]
    fn test_report_fields() {
        let out = evaluate_certificate(&basket(), &config()).unwrap();
        let r = &out.result;
        assert_eq!(r.worst_of, "TENARIS");
        assert_eq!(r.performance.len(), 2);
        assert_eq!(r.sample_paths.len(), 30);
        assert!(r.correlation.is_some());
        assert_eq!(r.rebased.len(), 2);
        assert_eq!(r.barrier_probability.num_simulations, 200);
        // 15 / 17 - 1 = -11.76%: above the -40% threshold.
        assert_eq!(r.indicative_redemption, dec!(1000));
    }

    #[test]
    fn test_redemption_floor() {
        let b = BarrierConfig::default();
        assert_eq!(redemption_for_price(&b, 10.0, -3.0).unwrap(), dec!(0));
        assert_eq!(redemption_for_price(&b, 10.0, 5.0).unwrap(), dec!(500));
    }

    #[test]
    fn test_redemption_beyond_decimal_range_is_notional() {
        let b = BarrierConfig::default();
        assert_eq!(redemption_for_price(&b, 10.0, 1e40).unwrap(), dec!(1000));
        assert_eq!(redemption_for_price(&b, 10.0, f64::INFINITY).unwrap(), dec!(1000));
        assert_eq!(redemption_for_price(&b, 10.0, f64::NEG_INFINITY).unwrap(), dec!(0));
    }

    #[test]
    fn test_simulate_worst_of_matches_report() {
        let c = config();
        let sim = simulate_worst_of(&basket(), &c).unwrap();
        let out = evaluate_certificate(&basket(), &c).unwrap();
        assert_eq!(sim.worst.underlying, out.result.worst_of);
        assert_eq!(sim.calibration, out.result.calibration);
        assert_eq!(sim.probability, out.result.barrier_probability);
        assert_eq!(sim.simulation.paths.len(), 200);
    }

    #[test]
    fn test_invalid_config_aborts() {
        let mut c = config();
        c.simulation.num_simulations = 0;
        assert!(matches!(
            evaluate_certificate(&basket(), &c),
            Err(WorstOfError::InvalidConfig { .. })
        ));
    }
}
