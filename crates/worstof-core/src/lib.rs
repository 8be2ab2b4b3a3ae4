pub mod analytics;
pub mod config;
pub mod error;
pub mod market;
pub mod payoff;
pub mod performance;
pub mod types;

#[cfg(feature = "monte_carlo")]
pub mod monte_carlo;

#[cfg(feature = "monte_carlo")]
pub mod evaluation;

pub use error::WorstOfError;
pub use types::*;

/// Standard result type for all worst-of engine operations
pub type WorstOfResult<T> = Result<T, WorstOfError>;
