//! The session: explicit owner of all simulation state.

use chrono::NaiveDateTime;
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use crate::cells::{CellRegistry, Chemistry, HistoricalSample};
use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::tasks::{Task, TaskKind, TaskLedger};

use super::clock::SimClock;
use super::summary::Summary;

/// All state of one interactive session.
///
/// Owns the cell registry, the task ledger, the random source and the
/// running flag. Every mutation goes through `&mut Session`, so a single
/// owner (or a single lock holder) is the only writer.
///
/// # Examples
///
/// ```
/// use cell_sim::cells::Chemistry;
/// use cell_sim::sim::session::Session;
///
/// let mut session = Session::new(Some(1));
/// session.create_cells(Chemistry::Lfp, 2);
/// session.tick();
/// assert_eq!(session.history().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    cells: CellRegistry,
    tasks: TaskLedger,
    rng: StdRng,
    running: bool,
}

impl Session {
    /// Creates an empty session anchored at the local wall clock.
    ///
    /// # Arguments
    ///
    /// * `seed` - Random seed; `None` draws from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        Self::from_clock(SimClock::now(), seed)
    }

    /// Creates an empty session with a fixed start timestamp.
    pub fn with_start(started_at: NaiveDateTime, seed: Option<u64>) -> Self {
        Self::from_clock(SimClock::new(started_at), seed)
    }

    fn from_clock(clock: SimClock, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            cells: CellRegistry::new(clock),
            tasks: TaskLedger::new(),
            rng,
            running: false,
        }
    }

    /// Builds a session from a validated scenario: creates the configured
    /// cell batches, queues the configured tasks and applies the startup
    /// flags.
    ///
    /// # Errors
    ///
    /// Propagates task lookup failures while starting configured tasks.
    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self> {
        let mut session = Self::new(cfg.simulation.seed);
        session.apply_config(cfg)?;
        Ok(session)
    }

    /// Applies a scenario's cells, tasks and startup flags on top of the
    /// current state.
    ///
    /// # Errors
    ///
    /// Propagates task lookup failures while starting configured tasks.
    pub fn apply_config(&mut self, cfg: &ScenarioConfig) -> Result<()> {
        for batch in &cfg.cells {
            self.create_cells(batch.chemistry, batch.count);
        }
        let ids: Vec<String> = cfg.tasks.iter().cloned().map(|k| self.add_task(k)).collect();
        if cfg.simulation.start_tasks {
            for id in &ids {
                self.start_task(id)?;
            }
        }
        if cfg.simulation.autostart {
            self.start();
        }
        Ok(())
    }

    /// See [`CellRegistry::create_cells`].
    pub fn create_cells(&mut self, chemistry: Chemistry, count: usize) -> Vec<String> {
        self.cells.create_cells(chemistry, count, &mut self.rng)
    }

    /// Runs one simulation tick regardless of the running flag.
    ///
    /// # Returns
    ///
    /// Number of samples recorded (zero with no cells).
    pub fn tick(&mut self) -> usize {
        self.cells.tick(&mut self.rng)
    }

    /// Runs one tick only if the running flag is set.
    pub fn auto_tick(&mut self) -> usize {
        if self.running { self.tick() } else { 0 }
    }

    /// Drops all cells and history.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Drops the history and restarts the tick counter.
    pub fn clear_history(&mut self) {
        self.cells.clear_history();
    }

    /// See [`TaskLedger::add_task`].
    pub fn add_task(&mut self, kind: TaskKind) -> String {
        self.tasks.add_task(kind)
    }

    /// See [`TaskLedger::start_task`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SimError::TaskNotFound`] for unknown ids.
    pub fn start_task(&mut self, task_id: &str) -> Result<()> {
        self.tasks.start_task(task_id)
    }

    /// See [`TaskLedger::delete_task`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SimError::TaskNotFound`] for unknown ids.
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task> {
        self.tasks.delete_task(task_id)
    }

    /// See [`TaskLedger::advance_progress`].
    pub fn advance_progress(&mut self) -> Vec<String> {
        self.tasks.advance_progress(&mut self.rng)
    }

    /// Sets the running flag gating [`Session::auto_tick`].
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            info!("simulation started");
        }
    }

    /// Clears the running flag.
    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            info!("simulation paused");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cells(&self) -> &CellRegistry {
        &self.cells
    }

    pub fn tasks(&self) -> &TaskLedger {
        &self.tasks
    }

    pub fn history(&self) -> &[HistoricalSample] {
        self.cells.history()
    }

    pub fn tick_count(&self) -> u64 {
        self.cells.tick_count()
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.cells.clock().started_at()
    }

    /// Aggregate statistics over the current state.
    pub fn summary(&self) -> Summary {
        Summary::from_session(self)
    }
}
