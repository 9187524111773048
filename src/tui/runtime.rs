//! TUI application state.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::cells::Chemistry;
use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::io::export::export_all;
use crate::sim::session::Session;
use crate::sim::ticker::Ticker;
use crate::tasks::{TaskKind, TaskStatus};

/// Telemetry tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [2000, 1000, 500, 250, 100, 50];

/// Duration of tasks queued from the keyboard.
const QUICK_TASK_SECONDS: u64 = 60;

/// TUI application state.
pub struct App {
    /// The live session.
    pub session: Session,
    /// Scenario the session was built from (kept for restart).
    scenario: ScenarioConfig,
    /// Timer for automatic telemetry ticks.
    telemetry: Ticker,
    /// Timer for task progress, independent of telemetry speed.
    progress: Ticker,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// Last one-line message shown in the footer.
    pub message: Option<String>,
    /// Directory CSV exports are written to.
    export_dir: PathBuf,
}

impl App {
    /// Creates an app from a scenario.
    ///
    /// # Errors
    ///
    /// Propagates session construction failures.
    pub fn new(scenario: ScenarioConfig, export_dir: PathBuf, now: Instant) -> Result<Self> {
        let session = Session::from_config(&scenario)?;
        let speed_idx = speed_index_for(scenario.simulation.tick_interval_ms);
        let progress = Ticker::new(progress_interval(&scenario), now);
        Ok(Self {
            session,
            telemetry: Ticker::new(Duration::from_millis(SPEED_LEVELS_MS[speed_idx]), now),
            progress,
            scenario,
            speed_idx,
            quit: false,
            message: None,
            export_dir,
        })
    }

    /// Fires every timer that has elapsed by `now`.
    ///
    /// Telemetry ticks only land while the session is running; progress
    /// always advances.
    pub fn update(&mut self, now: Instant) {
        for _ in 0..self.telemetry.poll(now) {
            self.session.auto_tick();
        }
        for _ in 0..self.progress.poll(now) {
            let done = self.session.advance_progress();
            if !done.is_empty() {
                self.message = Some(format!("completed: {}", done.join(", ")));
            }
        }
    }

    /// Earliest instant at which [`App::update`] has work to do.
    pub fn next_deadline(&self) -> Instant {
        self.telemetry
            .next_deadline()
            .min(self.progress.next_deadline())
    }

    pub fn toggle_running(&mut self) {
        if self.session.is_running() {
            self.session.pause();
        } else {
            self.session.start();
        }
    }

    /// Runs one tick now, whether or not the session is running.
    pub fn manual_tick(&mut self) {
        let samples = self.session.tick();
        self.message = Some(format!("tick recorded {samples} samples"));
    }

    pub fn add_cell(&mut self, chemistry: Chemistry) {
        let ids = self.session.create_cells(chemistry, 1);
        self.message = Some(format!("added {}", ids.join(", ")));
    }

    pub fn clear_cells(&mut self) {
        self.session.clear();
        self.message = Some("cells cleared".to_string());
    }

    pub fn clear_history(&mut self) {
        self.session.clear_history();
        self.message = Some("history cleared".to_string());
    }

    /// Queues a short IDLE task.
    pub fn add_idle_task(&mut self) {
        let id = self.session.add_task(TaskKind::Idle {
            time_seconds: QUICK_TASK_SECONDS,
        });
        self.message = Some(format!("queued {id}"));
    }

    /// Starts every pending task.
    pub fn start_pending(&mut self) {
        let pending: Vec<String> = self
            .session
            .tasks()
            .tasks()
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .map(|t| t.task_id.clone())
            .collect();
        let mut started = 0;
        for id in &pending {
            if self.session.start_task(id).is_ok() {
                started += 1;
            }
        }
        self.message = Some(format!("started {started} tasks"));
    }

    /// Deletes the oldest completed task, if any.
    pub fn delete_completed(&mut self) {
        let oldest = self
            .session
            .tasks()
            .tasks()
            .iter()
            .find(|t| t.status == TaskStatus::Completed)
            .map(|t| t.task_id.clone());
        self.message = Some(match oldest {
            Some(id) => match self.session.delete_task(&id) {
                Ok(_) => format!("deleted {id}"),
                Err(e) => e.to_string(),
            },
            None => "no completed task".to_string(),
        });
    }

    /// Writes all three CSV tables to the export directory.
    pub fn export(&mut self) {
        let now = Local::now().naive_local();
        self.message = Some(match export_all(&self.session, &self.export_dir, now) {
            Ok(paths) => format!("exported {} files to {}", paths.len(), self.export_dir.display()),
            Err(e) => format!("export failed: {e}"),
        });
    }

    /// Increases telemetry speed (shorter tick interval).
    pub fn speed_up(&mut self, now: Instant) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
            self.apply_speed(now);
        }
    }

    /// Decreases telemetry speed (longer tick interval).
    pub fn speed_down(&mut self, now: Instant) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
            self.apply_speed(now);
        }
    }

    fn apply_speed(&mut self, now: Instant) {
        self.telemetry
            .set_interval(Duration::from_millis(self.tick_interval_ms()), now);
    }

    /// Current telemetry tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Rebuilds the session from the scenario it started with.
    pub fn restart(&mut self, now: Instant) {
        self.message = Some(match Session::from_config(&self.scenario) {
            Ok(session) => {
                self.session = session;
                self.telemetry.reset(now);
                self.progress.reset(now);
                "restarted".to_string()
            }
            Err(e) => format!("restart failed: {e}"),
        });
    }
}

/// Picks the speed level closest to a configured interval.
fn speed_index_for(interval_ms: u64) -> usize {
    SPEED_LEVELS_MS
        .iter()
        .enumerate()
        .min_by_key(|&(_, &ms)| ms.abs_diff(interval_ms))
        .map_or(0, |(i, _)| i)
}

fn progress_interval(scenario: &ScenarioConfig) -> Duration {
    Duration::from_millis(scenario.simulation.progress_interval_ms.max(1))
}
