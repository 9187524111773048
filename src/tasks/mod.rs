//! Task queue with a random-increment progress driver.

/// Ordered task ledger and its mutations.
pub mod ledger;
pub mod types;

pub use ledger::TaskLedger;
pub use types::{Task, TaskKind, TaskParam, TaskStatus};
