pub mod calculator;
pub mod rebase;
pub mod selection;

pub use calculator::{compute_performance, performance_for_series, PerformanceRecord};
pub use rebase::{rebase_basket, RebasedPoint, RebasedSeries};
pub use selection::select_worst_of;
