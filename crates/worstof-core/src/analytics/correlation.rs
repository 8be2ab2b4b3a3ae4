use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calibration::simple_returns;
use crate::error::WorstOfError;
use crate::market::Basket;
use crate::WorstOfResult;

/// Pearson correlation of daily returns, rows and columns in basket order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub underlyings: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    /// Returns per underlying used for every pair.
    pub num_returns: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> WorstOfResult<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Ok(self.matrix[i][j])
    }

    fn index_of(&self, name: &str) -> WorstOfResult<usize> {
        self.underlyings
            .iter()
            .position(|u| u == name)
            .ok_or_else(|| WorstOfError::MissingUnderlying(name.to_string()))
    }
}

/// Correlation matrix of simple daily returns on the dates every series has
/// in common (from the strike date on).
pub fn correlation_matrix(
    basket: &Basket,
    strike_date: Option<NaiveDate>,
) -> WorstOfResult<CorrelationMatrix> {
    let mut iter = basket.iter();
    let first = iter.next().ok_or(WorstOfError::EmptyBasket)?;
    let others: Vec<_> = iter.collect();

    let common_dates: Vec<NaiveDate> = first
        .window_from(strike_date)
        .iter()
        .map(|o| o.date)
        .filter(|d| others.iter().all(|s| s.price_on(*d).is_some()))
        .collect();

    if common_dates.len() < 3 {
        let name = basket.names().join(", ");
        return Err(WorstOfError::insufficient(&name, 3, common_dates.len()));
    }

    let returns: Vec<Vec<f64>> = basket
        .iter()
        .map(|s| {
            let prices: Vec<f64> = common_dates
                .iter()
                .filter_map(|d| s.price_on(*d))
                .collect();
            simple_returns(&prices)
        })
        .collect();

    let n = returns.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let c = pearson(&returns[i], &returns[j]);
            matrix[i][j] = c;
            matrix[j][i] = c;
        }
    }

    Ok(CorrelationMatrix {
        underlyings: basket.names().iter().map(|s| s.to_string()).collect(),
        matrix,
        num_returns: common_dates.len() - 1,
    })
}

/// Sample Pearson correlation; 0 when either side has no variance.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (a, b) in x.iter().zip(y) {
        cov += (a - mx) * (b - my);
        vx += (a - mx).powi(2);
        vy += (b - my).powi(2);
    }
    if vx <= f64::EPSILON * f64::EPSILON || vy <= f64::EPSILON * f64::EPSILON {
        return 0.0;
    }
    (cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0)
}
