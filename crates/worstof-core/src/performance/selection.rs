use crate::error::WorstOfError;
use crate::performance::PerformanceRecord;
use crate::WorstOfResult;

/// The record with the lowest performance.
///
/// Ties resolve to the earliest record, i.e. basket insertion order.
pub fn select_worst_of(records: &[PerformanceRecord]) -> WorstOfResult<&PerformanceRecord> {
    let mut iter = records.iter();
    let mut worst = iter.next().ok_or(WorstOfError::EmptyBasket)?;
    for r in iter {
        if r.performance_pct < worst.performance_pct {
            worst = r;
        }
    }
    tracing::debug!(
        underlying = %worst.underlying,
        performance_pct = worst.performance_pct,
        "worst-of selected"
    );
    Ok(worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str, perf: f64) -> PerformanceRecord {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        PerformanceRecord {
            underlying: name.into(),
            strike_date: d,
            strike_price: 100.0,
            current_date: d,
            current_price: 100.0 + perf,
            performance_pct: perf,
            barrier_price: 60.0,
            barrier_breached: false,
            distance_to_barrier_pct: 0.0,
        }
    }

    #[test]
    fn test_selects_minimum() {
        let records = vec![
            record("GENERALI", 5.0),
            record("TENARIS", -12.0),
            record("TERNA", 3.0),
        ];
        assert_eq!(select_worst_of(&records).unwrap().underlying, "TENARIS");
    }

    #[test]
    fn test_tie_goes_to_first() {
        let records = vec![record("A", 1.0), record("B", -4.0), record("C", -4.0)];
        assert_eq!(select_worst_of(&records).unwrap().underlying, "B");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(select_worst_of(&[]), Err(WorstOfError::EmptyBasket)));
    }
}
