use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use worstof_core::config::{BarrierReference, CertificateConfig};
use worstof_core::market::Basket;

use crate::input;

/// Where the closing prices come from
#[derive(Args, Debug, Clone, Default)]
pub struct MarketArgs {
    /// Price table: wide CSV (date,<name>,...) or JSON basket; JSON on stdin when omitted
    #[arg(long)]
    pub prices: Option<String>,

    /// Comma-separated underlyings to analyse, in basket order (e.g. "GENERALI,TENARIS,TERNA")
    #[arg(long, value_delimiter = ',')]
    pub underlyings: Option<Vec<String>>,
}

impl MarketArgs {
    pub fn load(&self) -> Result<Basket, Box<dyn std::error::Error>> {
        input::prices::load_basket(self.prices.as_deref(), self.underlyings.as_deref())
    }
}

/// Certificate terms; flags override values from --config
#[derive(Args, Debug, Clone, Default)]
pub struct CertificateArgs {
    /// Path to a YAML or JSON certificate configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Barrier as a percentage of strike (0 < level <= 100)
    #[arg(long)]
    pub barrier_level: Option<Decimal>,

    /// Invested capital
    #[arg(long)]
    pub notional: Option<Decimal>,

    /// Strike date (YYYY-MM-DD); defaults to the first observation
    #[arg(long)]
    pub strike_date: Option<NaiveDate>,

    /// Number of simulated paths
    #[arg(long)]
    pub simulations: Option<u32>,

    /// Simulation horizon in trading days
    #[arg(long)]
    pub horizon_days: Option<u32>,

    /// Random seed for reproducible simulations
    #[arg(long)]
    pub seed: Option<u64>,

    /// Price the barrier percentage applies to for the probability: simulation_start or strike
    #[arg(long)]
    pub barrier_reference: Option<BarrierReference>,

    /// Number of simulated paths to include in the output
    #[arg(long)]
    pub sample_paths: Option<usize>,
}

impl CertificateArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<CertificateConfig, Box<dyn std::error::Error>> {
        let mut config: CertificateConfig = match self.config {
            Some(ref path) => input::file::read_config(path)?,
            None => CertificateConfig::default(),
        };

        if let Some(level) = self.barrier_level {
            config.barrier.barrier_level = level;
        }
        if let Some(notional) = self.notional {
            config.barrier.notional = notional;
        }
        if self.strike_date.is_some() {
            config.strike_date = self.strike_date;
        }
        if let Some(n) = self.simulations {
            config.simulation.num_simulations = n;
        }
        if let Some(h) = self.horizon_days {
            config.simulation.horizon_days = h;
        }
        if self.seed.is_some() {
            config.simulation.seed = self.seed;
        }
        if let Some(reference) = self.barrier_reference {
            config.barrier_reference = reference;
        }
        if let Some(k) = self.sample_paths {
            config.sample_paths = k;
        }

        config.validate()?;
        tracing::debug!(?config, "certificate configuration resolved");
        Ok(config)
    }
}
