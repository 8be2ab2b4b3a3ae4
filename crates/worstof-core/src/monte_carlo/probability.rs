use serde::{Deserialize, Serialize};

use super::simulation::SimulationResult;
use crate::error::WorstOfError;
use crate::WorstOfResult;

/// Share of simulated paths finishing strictly above the barrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrierProbability {
    pub barrier_price: f64,
    pub paths_above: usize,
    pub num_simulations: usize,
    /// `paths_above / num_simulations * 100`, in [0, 100].
    pub probability_pct: f64,
}

/// Probability (in percent) that the terminal price is strictly above
/// `barrier_price`.
///
/// Only the last element of each path is inspected: this is a European
/// barrier observed at maturity.
pub fn barrier_probability(
    result: &SimulationResult,
    barrier_price: f64,
) -> WorstOfResult<BarrierProbability> {
    if !barrier_price.is_finite() || barrier_price <= 0.0 {
        return Err(WorstOfError::invalid_config(
            "barrier_price",
            format!("must be positive, got {barrier_price}"),
        ));
    }
    let terminals = result.terminal_prices();
    if terminals.is_empty() {
        return Err(WorstOfError::insufficient("simulated paths", 1, 0));
    }

    let paths_above = terminals.iter().filter(|&&p| p > barrier_price).count();
    let probability_pct = paths_above as f64 / terminals.len() as f64 * 100.0;

    tracing::debug!(barrier_price, paths_above, probability_pct, "barrier probability");

    Ok(BarrierProbability {
        barrier_price,
        paths_above,
        num_simulations: terminals.len(),
        probability_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(terminals: &[f64]) -> SimulationResult {
        SimulationResult {
            start_price: 100.0,
            horizon_days: 2,
            seed: None,
            paths: terminals.iter().map(|t| vec![100.0, *t]).collect(),
        }
    }

    #[test]
    fn test_counts_strictly_above() {
        let r = result(&[50.0, 60.0, 61.0, 120.0]);
        let p = barrier_probability(&r, 60.0).unwrap();
        assert_eq!(p.paths_above, 2);
        assert_eq!(p.num_simulations, 4);
        assert_eq!(p.probability_pct, 50.0);
    }

    #[test]
    fn test_only_terminal_price_matters() {
        let r = SimulationResult {
            start_price: 100.0,
            horizon_days: 3,
            seed: None,
            paths: vec![vec![10.0, 5.0, 90.0]],
        };
        assert_eq!(barrier_probability(&r, 60.0).unwrap().probability_pct, 100.0);
    }

    #[test]
    fn test_bounds() {
        let r = result(&[1.0, 2.0]);
        assert_eq!(barrier_probability(&r, 60.0).unwrap().probability_pct, 0.0);
        let r = result(&[100.0, 200.0]);
        assert_eq!(barrier_probability(&r, 60.0).unwrap().probability_pct, 100.0);
    }

    #[test]
    fn test_invalid_barrier() {
        let r = result(&[1.0]);
        assert!(barrier_probability(&r, 0.0).is_err());
        assert!(barrier_probability(&r, f64::NAN).is_err());
    }

    #[test]
    fn test_empty_result() {
        let r = result(&[]);
        assert!(barrier_probability(&r, 60.0).is_err());
    }
}
