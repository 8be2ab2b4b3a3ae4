use serde::{Deserialize, Serialize};

use super::series::PriceSeries;
use crate::error::WorstOfError;
use crate::WorstOfResult;

#[derive(Debug, Clone, Deserialize)]
struct RawBasket {
    series: Vec<PriceSeries>,
}

/// The certificate's underlyings, in the order they were supplied.
///
/// Insertion order is significant: it is the tie-break order of the
/// worst-of selection and the row/column order of every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBasket")]
pub struct Basket {
    series: Vec<PriceSeries>,
}

impl TryFrom<RawBasket> for Basket {
    type Error = WorstOfError;

    fn try_from(raw: RawBasket) -> Result<Self, Self::Error> {
        Basket::new(raw.series)
    }
}

impl Basket {
    pub fn new(series: Vec<PriceSeries>) -> WorstOfResult<Self> {
        if series.is_empty() {
            return Err(WorstOfError::EmptyBasket);
        }
        for (i, s) in series.iter().enumerate() {
            if series[..i].iter().any(|other| other.name() == s.name()) {
                return Err(WorstOfError::InvalidSeries {
                    underlying: s.name().to_string(),
                    reason: "underlying appears more than once in the basket".into(),
                });
            }
        }
        Ok(Basket { series })
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSeries> {
        self.series.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name()).collect()
    }

    pub fn get(&self, name: &str) -> WorstOfResult<&PriceSeries> {
        self.series
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| WorstOfError::MissingUnderlying(name.to_string()))
    }

    /// Sub-basket with exactly the requested underlyings, in request order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> WorstOfResult<Basket> {
        let series = names
            .iter()
            .map(|n| self.get(n.as_ref()).cloned())
            .collect::<WorstOfResult<Vec<_>>>()?;
        Basket::new(series)
    }
}
