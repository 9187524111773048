/// Synthetic timestamp source for telemetry samples.
pub mod clock;
/// Explicit session state replacing any global.
pub mod session;
pub mod summary;
/// Fixed-interval timers driving ticks and task progress.
pub mod ticker;
