use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand::distributions::Distribution;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

use crate::analytics::CalibratedParams;
use crate::config::SimulationConfig;
use crate::error::WorstOfError;
use crate::WorstOfResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Simulated price paths of the worst-of underlying.
///
/// Every path has `horizon_days` prices and starts from the same
/// `start_price`; `paths[i][0]` is the price after the first simulated day,
/// so day 0 itself is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub start_price: f64,
    pub horizon_days: u32,
    /// Seed used, when the run was seeded through [`simulate_paths`].
    pub seed: Option<u64>,
    pub paths: Vec<Vec<f64>>,
}

impl SimulationResult {
    pub fn num_simulations(&self) -> usize {
        self.paths.len()
    }

    /// Final price of every path, in path order.
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.paths
            .iter()
            .filter_map(|p| p.last().copied())
            .collect()
    }

    /// Number of paths that went to zero or below at any step.
    pub fn non_positive_paths(&self) -> usize {
        self.paths
            .iter()
            .filter(|p| p.iter().any(|&x| x <= 0.0))
            .count()
    }
}

/// Daily return source: Normal(mu, sigma), or the constant drift when the
/// calibrated volatility is zero.
enum DailyReturns {
    Constant(f64),
    Gaussian(Normal),
}

impl DailyReturns {
    fn new(params: &CalibratedParams) -> WorstOfResult<Self> {
        if !params.mu.is_finite() {
            return Err(WorstOfError::invalid_config(
                "mu",
                format!("must be finite, got {}", params.mu),
            ));
        }
        if !params.sigma.is_finite() || params.sigma < 0.0 {
            return Err(WorstOfError::invalid_config(
                "sigma",
                format!("must be finite and non-negative, got {}", params.sigma),
            ));
        }
        if params.sigma == 0.0 {
            return Ok(DailyReturns::Constant(params.mu));
        }
        let normal = Normal::new(params.mu, params.sigma).map_err(|e| {
            WorstOfError::invalid_config("sigma", format!("Invalid Normal parameters: {e}"))
        })?;
        Ok(DailyReturns::Gaussian(normal))
    }

    /// Overwrite `buf` with `n` fresh daily returns.
    fn fill<R: Rng + ?Sized>(&self, rng: &mut R, n: usize, buf: &mut Vec<f64>) {
        buf.clear();
        match self {
            DailyReturns::Constant(mu) => buf.resize(n, *mu),
            DailyReturns::Gaussian(normal) => buf.extend(normal.sample_iter(&mut *rng).take(n)),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate price paths from `start_price` using a generator seeded from
/// `config.seed` (or from entropy when unseeded).
///
/// Each call owns its generator, so concurrent callers never share state.
pub fn simulate_paths(
    start_price: f64,
    params: &CalibratedParams,
    config: &SimulationConfig,
) -> WorstOfResult<SimulationResult> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut result = simulate_paths_with_rng(
        start_price,
        params,
        config.num_simulations,
        config.horizon_days,
        &mut rng,
    )?;
    result.seed = config.seed;
    Ok(result)
}

/// Simulate price paths with a caller-supplied random source.
///
/// For each path, `horizon_days` daily returns are drawn from
/// Normal(mu, sigma) in one batch and compounded arithmetically:
/// `path[t] = start_price * prod_{k<=t} (1 + r_k)`. A draw below -100% makes
/// the path negative; that is a limitation of the model, not an error.
pub fn simulate_paths_with_rng<R: Rng + ?Sized>(
    start_price: f64,
    params: &CalibratedParams,
    num_simulations: u32,
    horizon_days: u32,
    rng: &mut R,
) -> WorstOfResult<SimulationResult> {
    if !start_price.is_finite() || start_price <= 0.0 {
        return Err(WorstOfError::invalid_config(
            "start_price",
            format!("must be positive, got {start_price}"),
        ));
    }
    if num_simulations == 0 {
        return Err(WorstOfError::invalid_config(
            "num_simulations",
            "must be at least 1",
        ));
    }
    if horizon_days == 0 {
        return Err(WorstOfError::invalid_config(
            "horizon_days",
            "must be at least 1",
        ));
    }

    let returns = DailyReturns::new(params)?;
    let horizon = horizon_days as usize;
    let mut draws: Vec<f64> = Vec::with_capacity(horizon);
    let mut paths = Vec::with_capacity(num_simulations as usize);

    for _ in 0..num_simulations {
        returns.fill(rng, horizon, &mut draws);
        let mut price = start_price;
        let path: Vec<f64> = draws
            .iter()
            .map(|r| {
                price *= 1.0 + r;
                price
            })
            .collect();
        paths.push(path);
    }

    tracing::debug!(
        underlying = %params.underlying,
        num_simulations,
        horizon_days,
        start_price,
        "paths simulated"
    );

    Ok(SimulationResult {
        start_price,
        horizon_days,
        seed: None,
        paths,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
