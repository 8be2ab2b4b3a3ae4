use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WorstOfError;
use crate::market::Basket;
use crate::WorstOfResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebasedPoint {
    pub date: NaiveDate,
    pub level: f64,
}

/// Price history rebased to 100 at the strike observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebasedSeries {
    pub underlying: String,
    pub points: Vec<RebasedPoint>,
}

/// Rebase every underlying to 100 at its strike observation.
///
/// A barrier of 60% sits at level 60 on this scale for every underlying.
pub fn rebase_basket(
    basket: &Basket,
    strike_date: Option<NaiveDate>,
) -> WorstOfResult<Vec<RebasedSeries>> {
    basket
        .iter()
        .map(|series| {
            let window = series.window_from(strike_date);
            let base = window
                .first()
                .ok_or_else(|| WorstOfError::insufficient(series.name(), 1, 0))?
                .price;
            Ok(RebasedSeries {
                underlying: series.name().to_string(),
                points: window
                    .iter()
                    .map(|o| RebasedPoint {
                        date: o.date,
                        level: o.price / base * 100.0,
                    })
                    .collect(),
            })
        })
        .collect()
}
