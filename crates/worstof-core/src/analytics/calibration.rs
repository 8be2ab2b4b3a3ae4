use serde::{Deserialize, Serialize};

use crate::error::WorstOfError;
use crate::market::PriceSeries;
use crate::types::TRADING_DAYS_PER_YEAR;
use crate::WorstOfResult;

/// Sample mean and standard deviation need at least two returns.
const MIN_RETURNS: usize = 2;

/// Daily return parameters estimated from one underlying's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratedParams {
    pub underlying: String,
    /// Mean simple daily return.
    pub mu: f64,
    /// Sample standard deviation (n - 1) of simple daily returns.
    pub sigma: f64,
    pub num_returns: usize,
}

impl CalibratedParams {
    pub fn annualized_volatility_pct(&self) -> f64 {
        annualized_volatility_pct(self.sigma)
    }
}

/// Simple returns `(p_t - p_{t-1}) / p_{t-1}` of consecutive prices.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Daily sigma scaled by sqrt(252), in percent.
pub fn annualized_volatility_pct(sigma: f64) -> f64 {
    sigma * (TRADING_DAYS_PER_YEAR as f64).sqrt() * 100.0
}

/// Estimate drift and volatility from the series' simple daily returns.
pub fn calibrate(series: &PriceSeries) -> WorstOfResult<CalibratedParams> {
    let prices: Vec<f64> = series.prices().collect();
    let returns = simple_returns(&prices);
    if returns.len() < MIN_RETURNS {
        // Report in terms of prices, which is what the caller supplies.
        return Err(WorstOfError::insufficient(
            series.name(),
            MIN_RETURNS + 1,
            prices.len(),
        ));
    }

    let n = returns.len() as f64;
    let mu = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mu).powi(2)).sum::<f64>() / (n - 1.0);
    let sigma = variance.sqrt();

    tracing::debug!(underlying = %series.name(), mu, sigma, n = returns.len(), "returns calibrated");

    Ok(CalibratedParams {
        underlying: series.name().to_string(),
        mu,
        sigma,
        num_returns: returns.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_pairs(
            "TENARIS",
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| (start + chrono::Duration::days(i as i64), *p)),
        )
        .unwrap()
    }

    #[test]
    fn test_simple_returns() {
        let r = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.10).abs() < 1e-12);
        assert!((r[1] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_sample_statistics() {
        // returns 0.10, -0.10 -> mean 0, sample sd = sqrt(0.02) ~ 0.141421
        let p = calibrate(&series(&[100.0, 110.0, 99.0])).unwrap();
        assert!(p.mu.abs() < 1e-12);
        assert!((p.sigma - 0.02_f64.sqrt()).abs() < 1e-12);
        assert_eq!(p.num_returns, 2);
    }

    #[test]
    fn test_constant_prices_zero_sigma() {
        let p = calibrate(&series(&[50.0, 50.0, 50.0, 50.0])).unwrap();
        assert_eq!(p.mu, 0.0);
        assert_eq!(p.sigma, 0.0);
    }

    #[test]
    fn test_two_prices_insufficient() {
        let err = calibrate(&series(&[10.0, 11.0])).unwrap_err();
        assert!(matches!(
            err,
            WorstOfError::InsufficientData { required: 3, found: 2, .. }
        ));
    }

    #[test]
    fn test_annualized_volatility() {
        let v = annualized_volatility_pct(0.01);
        assert!((v - 0.01 * 252f64.sqrt() * 100.0).abs() < 1e-12);
    }
}
