pub mod analytics;
pub mod common;
pub mod monte_carlo;
pub mod payoff;
pub mod performance;
