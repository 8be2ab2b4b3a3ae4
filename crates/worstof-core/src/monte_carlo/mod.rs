pub mod probability;
pub mod simulation;
pub mod statistics;

pub use probability::{barrier_probability, BarrierProbability};
pub use simulation::{simulate_paths, simulate_paths_with_rng, SimulationResult};
pub use statistics::{terminal_statistics, McPercentiles, TerminalStatistics};
