//! REST API over a live session.
//!
//! Cells:
//! - `GET /cells`, `POST /cells`, `DELETE /cells`, `GET /cells/{id}`
//!
//! Simulation and history:
//! - `POST /simulation/tick`, `POST /simulation/start`, `POST /simulation/pause`
//! - `GET /history`, `DELETE /history`
//!
//! Tasks:
//! - `GET /tasks`, `POST /tasks`, `POST /tasks/{id}/start`, `DELETE /tasks/{id}`
//!
//! Reports:
//! - `GET /summary`, `GET /export/{cells|tasks|history}`

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::sim::session::Session;

pub use types::{ErrorResponse, HistoryQuery};

/// Application state shared across request handlers and the background
/// driver.
///
/// The session is the single writer of all simulation state; every handler
/// and the driver take the lock for the duration of one operation.
pub struct AppState {
    session: Mutex<Session>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// Locks the session. A panic in another holder does not leave the
    /// session in a torn state, so a poisoned lock is recovered.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/cells",
            get(handlers::list_cells)
                .post(handlers::create_cells)
                .delete(handlers::clear_cells),
        )
        .route("/cells/{id}", get(handlers::get_cell))
        .route("/simulation/tick", post(handlers::tick))
        .route("/simulation/start", post(handlers::start_simulation))
        .route("/simulation/pause", post(handlers::pause_simulation))
        .route(
            "/history",
            get(handlers::get_history).delete(handlers::clear_history),
        )
        .route("/tasks", get(handlers::list_tasks).post(handlers::add_task))
        .route("/tasks/{id}", axum::routing::delete(handlers::delete_task))
        .route("/tasks/{id}/start", post(handlers::start_task))
        .route("/summary", get(handlers::get_summary))
        .route("/export/{kind}", get(handlers::export))
        .with_state(state)
}

/// Drives the session on two independent timers: telemetry ticks (only
/// while running) and task progress.
///
/// Runs until the task is aborted.
pub async fn drive(state: Arc<AppState>, tick_every: Duration, progress_every: Duration) {
    let mut ticks = tokio::time::interval(tick_every);
    let mut progress = tokio::time::interval(progress_every);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    progress.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                let samples = state.lock().auto_tick();
                if samples > 0 {
                    debug!(samples, "auto tick");
                }
            }
            _ = progress.tick() => {
                state.lock().advance_progress();
            }
        }
    }
}

/// Spawns [`drive`] on the current runtime.
pub fn spawn_driver(
    state: Arc<AppState>,
    tick_every: Duration,
    progress_every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(drive(state, tick_every, progress_every))
}

/// Binds to the given address, starts the background driver and serves the
/// API.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
/// * `tick_every` - Automatic tick interval
/// * `progress_every` - Task progress interval
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(
    state: Arc<AppState>,
    addr: SocketAddr,
    tick_every: Duration,
    progress_every: Duration,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let driver = spawn_driver(Arc::clone(&state), tick_every, progress_every);
    info!(%addr, "API server listening");
    let result = axum::serve(listener, router(state)).await;
    driver.abort();
    result
}
