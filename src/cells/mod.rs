//! Battery cell models and the registry that owns them.

/// A single simulated cell and its per-tick perturbation.
pub mod cell;
/// Cell collection, history of samples, and the tick counter.
pub mod registry;
pub mod types;

pub use cell::Cell;
pub use registry::{CellRegistry, HistoricalSample};
pub use types::{CellStatus, Chemistry};
