use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::BarrierConfig;
use crate::error::WorstOfError;
use crate::market::{Basket, PriceSeries};
use crate::WorstOfResult;

/// Minimum observations on or after the strike date for a meaningful
/// strike-to-current comparison.
const MIN_OBSERVATIONS: usize = 2;

/// Performance of one underlying since strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub underlying: String,
    /// Date of the strike observation (first date on or after the strike date).
    pub strike_date: NaiveDate,
    pub strike_price: f64,
    pub current_date: NaiveDate,
    pub current_price: f64,
    /// Simple return since strike, in percent.
    pub performance_pct: f64,
    /// Strike price x barrier level.
    pub barrier_price: f64,
    /// True iff current price is strictly below the barrier price.
    pub barrier_breached: bool,
    /// Cushion between current price and barrier, in percent of current price.
    pub distance_to_barrier_pct: f64,
}

/// Performance record for a single series.
///
/// The barrier is checked against the absolute barrier price, never against
/// the performance percentage.
pub fn performance_for_series(
    series: &PriceSeries,
    strike_date: Option<NaiveDate>,
    barrier: &BarrierConfig,
) -> WorstOfResult<PerformanceRecord> {
    let window = series.window_from(strike_date);
    if window.len() < MIN_OBSERVATIONS {
        return Err(WorstOfError::insufficient(
            series.name(),
            MIN_OBSERVATIONS,
            window.len(),
        ));
    }

    let strike = window[0];
    let current = window[window.len() - 1];
    let performance_pct = (current.price - strike.price) / strike.price * 100.0;
    let barrier_price = barrier.barrier_price(strike.price)?;

    Ok(PerformanceRecord {
        underlying: series.name().to_string(),
        strike_date: strike.date,
        strike_price: strike.price,
        current_date: current.date,
        current_price: current.price,
        performance_pct,
        barrier_price,
        barrier_breached: current.price < barrier_price,
        distance_to_barrier_pct: (current.price - barrier_price) / current.price * 100.0,
    })
}

/// Performance of every underlying in basket order.
///
/// Fails on the first underlying without enough data; no partial result is
/// returned.
pub fn compute_performance(
    basket: &Basket,
    strike_date: Option<NaiveDate>,
    barrier: &BarrierConfig,
) -> WorstOfResult<Vec<PerformanceRecord>> {
    barrier.validate()?;
    let records = basket
        .iter()
        .map(|series| performance_for_series(series, strike_date, barrier))
        .collect::<WorstOfResult<Vec<_>>>()?;

    for r in &records {
        tracing::debug!(
            underlying = %r.underlying,
            strike = r.strike_price,
            current = r.current_price,
            performance_pct = r.performance_pct,
            breached = r.barrier_breached,
            "performance computed"
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn barrier60() -> BarrierConfig {
        BarrierConfig::new(dec!(60), dec!(1000)).unwrap()
    }

    #[test]
    fn test_simple_performance() {
        let s = PriceSeries::from_pairs("G", vec![(d(2), 100.0), (d(3), 90.0), (d(4), 110.0)])
            .unwrap();
        let r = performance_for_series(&s, None, &barrier60()).unwrap();
        assert_eq!(r.strike_price, 100.0);
        assert_eq!(r.current_price, 110.0);
        assert!((r.performance_pct - 10.0).abs() < 1e-9);
        assert_eq!(r.strike_date, d(2));
        assert_eq!(r.current_date, d(4));
    }

    #[test]
    fn test_strike_date_between_observations() {
        let s = PriceSeries::from_pairs("G", vec![(d(2), 50.0), (d(5), 80.0), (d(8), 60.0)])
            .unwrap();
        let r = performance_for_series(&s, Some(d(3)), &barrier60()).unwrap();
        assert_eq!(r.strike_date, d(5));
        assert_eq!(r.strike_price, 80.0);
        assert!((r.performance_pct + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_breach_uses_absolute_barrier() {
        // strike 100, barrier 60 -> breach iff current < 60
        let above = PriceSeries::from_pairs("A", vec![(d(2), 100.0), (d(3), 60.0)]).unwrap();
        let below = PriceSeries::from_pairs("B", vec![(d(2), 100.0), (d(3), 59.99)]).unwrap();
        let ra = performance_for_series(&above, None, &barrier60()).unwrap();
        let rb = performance_for_series(&below, None, &barrier60()).unwrap();
        assert!((ra.barrier_price - 60.0).abs() < 1e-12);
        assert!(!ra.barrier_breached);
        assert!(rb.barrier_breached);
        assert!(rb.distance_to_barrier_pct < 0.0);
    }

    #[test]
    fn test_single_row_is_insufficient() {
        let s = PriceSeries::from_pairs("TERNA", vec![(d(2), 7.0)]).unwrap();
        let err = performance_for_series(&s, None, &barrier60()).unwrap_err();
        assert!(matches!(
            err,
            WorstOfError::InsufficientData { required: 2, found: 1, .. }
        ));
    }

    #[test]
    fn test_strike_after_last_observation_is_insufficient() {
        let s = PriceSeries::from_pairs("G", vec![(d(2), 7.0), (d(3), 8.0)]).unwrap();
        assert!(matches!(
            performance_for_series(&s, Some(d(10)), &barrier60()),
            Err(WorstOfError::InsufficientData { found: 0, .. })
        ));
    }

    #[test]
    fn test_compute_performance_basket_order_and_failure() {
        let a = PriceSeries::from_pairs("A", vec![(d(2), 10.0), (d(3), 11.0)]).unwrap();
        let b = PriceSeries::from_pairs("B", vec![(d(2), 10.0), (d(3), 9.0)]).unwrap();
        let basket = Basket::new(vec![a.clone(), b]).unwrap();
        let records = compute_performance(&basket, None, &barrier60()).unwrap();
        assert_eq!(records[0].underlying, "A");
        assert_eq!(records[1].underlying, "B");

        let short = PriceSeries::from_pairs("C", vec![(d(2), 10.0)]).unwrap();
        let basket = Basket::new(vec![a, short]).unwrap();
        assert!(compute_performance(&basket, None, &barrier60()).is_err());
    }

    #[test]
    fn test_invalid_barrier_rejected() {
        let a = PriceSeries::from_pairs("A", vec![(d(2), 10.0), (d(3), 11.0)]).unwrap();
        let basket = Basket::new(vec![a]).unwrap();
        let bad = BarrierConfig {
            barrier_level: dec!(120),
            notional: dec!(1000),
        };
        assert!(matches!(
            compute_performance(&basket, None, &bad),
            Err(WorstOfError::InvalidConfig { .. })
        ));
    }
}
