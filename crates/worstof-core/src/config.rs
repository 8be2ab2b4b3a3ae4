//! Certificate configuration.
//!
//! Everything a run needs is carried in an explicit [`CertificateConfig`]
//! passed into each stage; the engine holds no process-wide state.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WorstOfError;
use crate::types::{Money, Percent, TRADING_DAYS_PER_YEAR};
use crate::WorstOfResult;

/// Barrier level and invested capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrierConfig {
    /// Barrier as a percentage of strike, in (0, 100].
    #[serde(default = "default_barrier_level")]
    pub barrier_level: Percent,
    /// Invested capital, strictly positive.
    #[serde(default = "default_notional")]
    pub notional: Money,
}

fn default_barrier_level() -> Percent {
    dec!(60)
}

fn default_notional() -> Money {
    dec!(1000)
}

impl Default for BarrierConfig {
    fn default() -> Self {
        BarrierConfig {
            barrier_level: default_barrier_level(),
            notional: default_notional(),
        }
    }
}

impl BarrierConfig {
    pub fn new(barrier_level: Percent, notional: Money) -> WorstOfResult<Self> {
        let config = BarrierConfig {
            barrier_level,
            notional,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WorstOfResult<()> {
        if self.barrier_level <= Decimal::ZERO || self.barrier_level > dec!(100) {
            return Err(WorstOfError::invalid_config(
                "barrier_level",
                format!("must be in (0, 100], got {}", self.barrier_level),
            ));
        }
        if self.notional <= Decimal::ZERO {
            return Err(WorstOfError::invalid_config(
                "notional",
                format!("must be positive, got {}", self.notional),
            ));
        }
        Ok(())
    }

    /// Barrier as a fraction of the reference price (60% -> 0.6).
    pub fn level_ratio(&self) -> WorstOfResult<f64> {
        (self.barrier_level / dec!(100)).to_f64().ok_or_else(|| {
            WorstOfError::invalid_config("barrier_level", "not representable as f64")
        })
    }

    /// Absolute barrier price for a given reference price.
    pub fn barrier_price(&self, reference_price: f64) -> WorstOfResult<f64> {
        Ok(reference_price * self.level_ratio()?)
    }

    /// Worst-of performance (in percent) at which protection is lost:
    /// a 60% barrier gives -40.
    pub fn protection_threshold(&self) -> Percent {
        self.barrier_level - dec!(100)
    }
}

/// Monte Carlo run size and seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_num_simulations")]
    pub num_simulations: u32,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_num_simulations() -> u32 {
    1_000
}

fn default_horizon_days() -> u32 {
    TRADING_DAYS_PER_YEAR
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_simulations: default_num_simulations(),
            horizon_days: default_horizon_days(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> WorstOfResult<()> {
        if self.num_simulations == 0 {
            return Err(WorstOfError::invalid_config(
                "num_simulations",
                "must be at least 1",
            ));
        }
        if self.horizon_days == 0 {
            return Err(WorstOfError::invalid_config(
                "horizon_days",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Worst-of performance grid over which the payoff curve is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffDomain {
    #[serde(default = "default_domain_start")]
    pub start: Percent,
    #[serde(default = "default_domain_end")]
    pub end: Percent,
    #[serde(default = "default_domain_points")]
    pub points: usize,
}

fn default_domain_start() -> Percent {
    dec!(-100)
}

fn default_domain_end() -> Percent {
    dec!(40)
}

fn default_domain_points() -> usize {
    100
}

impl Default for PayoffDomain {
    fn default() -> Self {
        PayoffDomain {
            start: default_domain_start(),
            end: default_domain_end(),
            points: default_domain_points(),
        }
    }
}

impl PayoffDomain {
    pub fn validate(&self) -> WorstOfResult<()> {
        if self.points < 2 {
            return Err(WorstOfError::invalid_config(
                "payoff_domain.points",
                format!("must be at least 2, got {}", self.points),
            ));
        }
        if self.start >= self.end {
            return Err(WorstOfError::invalid_config(
                "payoff_domain",
                format!("start ({}) must be below end ({})", self.start, self.end),
            ));
        }
        if self.start < dec!(-100) {
            return Err(WorstOfError::invalid_config(
                "payoff_domain.start",
                format!("performance cannot be below -100%, got {}", self.start),
            ));
        }
        Ok(())
    }

    /// Evenly spaced grid including both endpoints.
    pub fn grid(&self) -> Vec<Percent> {
        let step = (self.end - self.start) / Decimal::from(self.points - 1);
        (0..self.points)
            .map(|i| {
                if i == self.points - 1 {
                    self.end
                } else {
                    self.start + step * Decimal::from(i)
                }
            })
            .collect()
    }
}

/// Which price the barrier percentage is applied to when estimating the
/// probability of staying above the barrier at maturity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierReference {
    /// The simulated paths' starting price (last observed price).
    #[default]
    SimulationStart,
    /// The worst-of underlying's strike price.
    Strike,
}

impl fmt::Display for BarrierReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarrierReference::SimulationStart => write!(f, "simulation_start"),
            BarrierReference::Strike => write!(f, "strike"),
        }
    }
}

impl FromStr for BarrierReference {
    type Err = WorstOfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "simulation_start" | "spot" => Ok(BarrierReference::SimulationStart),
            "strike" => Ok(BarrierReference::Strike),
            other => Err(WorstOfError::invalid_config(
                "barrier_reference",
                format!("expected 'simulation_start' or 'strike', got '{other}'"),
            )),
        }
    }
}

/// Full configuration of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateConfig {
    #[serde(default)]
    pub barrier: BarrierConfig,
    /// Strike date; `None` uses the first observation of each series.
    #[serde(default)]
    pub strike_date: Option<NaiveDate>,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub payoff_domain: PayoffDomain,
    #[serde(default)]
    pub barrier_reference: BarrierReference,
    /// Number of simulated paths copied into the report for charting.
    #[serde(default = "default_sample_paths")]
    pub sample_paths: usize,
}

fn default_sample_paths() -> usize {
    30
}

impl Default for CertificateConfig {
    fn default() -> Self {
        CertificateConfig {
            barrier: BarrierConfig::default(),
            strike_date: None,
            simulation: SimulationConfig::default(),
            payoff_domain: PayoffDomain::default(),
            barrier_reference: BarrierReference::default(),
            sample_paths: default_sample_paths(),
        }
    }
}

impl CertificateConfig {
    pub fn validate(&self) -> WorstOfResult<()> {
        self.barrier.validate()?;
        self.simulation.validate()?;
        self.payoff_domain.validate()?;
        Ok(())
    }
}
