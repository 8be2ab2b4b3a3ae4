//! Market data handed to the engine by the caller.
//!
//! The engine never fetches prices itself: a presentation shell materializes
//! closing prices into [`PriceSeries`] values and groups them into a
//! [`Basket`]. Both types validate their invariants at construction, so the
//! calculators downstream can index into them without re-checking.

pub mod basket;
pub mod series;

pub use basket::Basket;
pub use series::{Observation, PriceSeries};
