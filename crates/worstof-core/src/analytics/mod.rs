pub mod calibration;
pub mod correlation;

pub use calibration::{annualized_volatility_pct, calibrate, simple_returns, CalibratedParams};
pub use correlation::{correlation_matrix, CorrelationMatrix};
