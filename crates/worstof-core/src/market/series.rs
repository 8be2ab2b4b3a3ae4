use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WorstOfError;
use crate::WorstOfResult;

/// One closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RawPriceSeries {
    name: String,
    observations: Vec<Observation>,
}

/// Time-ordered closing prices of a single underlying.
///
/// Invariants: at least one observation, dates strictly increasing, every
/// price finite and strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    name: String,
    observations: Vec<Observation>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = WorstOfError;

    fn try_from(raw: RawPriceSeries) -> Result<Self, Self::Error> {
        PriceSeries::new(raw.name, raw.observations)
    }
}

impl PriceSeries {
    pub fn new(name: impl Into<String>, observations: Vec<Observation>) -> WorstOfResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WorstOfError::InvalidSeries {
                underlying: name,
                reason: "underlying name must not be blank".into(),
            });
        }
        if observations.is_empty() {
            return Err(WorstOfError::insufficient(&name, 1, 0));
        }
        for (i, obs) in observations.iter().enumerate() {
            if !obs.price.is_finite() || obs.price <= 0.0 {
                return Err(WorstOfError::InvalidSeries {
                    underlying: name,
                    reason: format!("price on {} must be positive, got {}", obs.date, obs.price),
                });
            }
            if i > 0 && observations[i - 1].date >= obs.date {
                return Err(WorstOfError::InvalidSeries {
                    underlying: name,
                    reason: format!(
                        "dates must be strictly increasing ({} follows {})",
                        obs.date,
                        observations[i - 1].date
                    ),
                });
            }
        }
        Ok(PriceSeries { name, observations })
    }

    /// Build a series from `(date, price)` pairs.
    pub fn from_pairs(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> WorstOfResult<Self> {
        let observations = pairs
            .into_iter()
            .map(|(date, price)| Observation { date, price })
            .collect();
        PriceSeries::new(name, observations)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.price)
    }

    pub fn first(&self) -> &Observation {
        &self.observations[0]
    }

    pub fn last(&self) -> &Observation {
        &self.observations[self.observations.len() - 1]
    }

    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by(|o| o.date.cmp(&date))
            .ok()
            .map(|i| self.observations[i].price)
    }

    /// Observations on or after `strike_date` (all of them when `None`).
    pub fn window_from(&self, strike_date: Option<NaiveDate>) -> &[Observation] {
        match strike_date {
            Some(date) => {
                let start = self.observations.partition_point(|o| o.date < date);
                &self.observations[start..]
            }
            None => &self.observations,
        }
    }

    /// Owned copy of the window starting at `strike_date`.
    pub fn since(&self, strike_date: Option<NaiveDate>) -> WorstOfResult<PriceSeries> {
        let window = self.window_from(strike_date);
        if window.is_empty() {
            return Err(WorstOfError::insufficient(&self.name, 1, 0));
        }
        Ok(PriceSeries {
            name: self.name.clone(),
            observations: window.to_vec(),
        })
    }
}
