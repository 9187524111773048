//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use super::AppState;
use super::types::{
    ApiError, CreateCellsRequest, CreatedCells, CreatedTask, HistoryQuery, SimulationStatus,
    TickResponse,
};
use crate::cells::registry::{MAX_BATCH, MIN_BATCH};
use crate::cells::{Cell, HistoricalSample};
use crate::io::export::{ExportKind, write_csv};
use crate::sim::summary::Summary;
use crate::tasks::{Task, TaskKind};

/// `GET /cells` → all cells in creation order.
pub async fn list_cells(State(state): State<Arc<AppState>>) -> Json<Vec<Cell>> {
    Json(state.lock().cells().cells().to_vec())
}

/// `POST /cells` → 201 + created ids; count outside 1..=20 → 400.
pub async fn create_cells(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCellsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !(MIN_BATCH..=MAX_BATCH).contains(&req.count) {
        return Err(ApiError::BadRequest(format!(
            "`count` ({}) must be in [{MIN_BATCH}, {MAX_BATCH}]",
            req.count
        )));
    }
    let cell_ids = state.lock().create_cells(req.chemistry, req.count);
    Ok((StatusCode::CREATED, Json(CreatedCells { cell_ids })))
}

/// `GET /cells/{id}` → one cell, or 404.
pub async fn get_cell(
    State(state): State<Arc<AppState>>,
    Path(cell_id): Path<String>,
) -> Result<Json<Cell>, ApiError> {
    let session = state.lock();
    Ok(Json(session.cells().get(&cell_id)?.clone()))
}

/// `DELETE /cells` → drops all cells and history.
pub async fn clear_cells(State(state): State<Arc<AppState>>) -> StatusCode {
    state.lock().clear();
    StatusCode::NO_CONTENT
}

/// `POST /simulation/tick` → runs one tick now.
pub async fn tick(State(state): State<Arc<AppState>>) -> Json<TickResponse> {
    let mut session = state.lock();
    let samples = session.tick();
    Json(TickResponse {
        samples,
        tick: session.tick_count(),
    })
}

/// `POST /simulation/start` → sets the running flag.
pub async fn start_simulation(State(state): State<Arc<AppState>>) -> Json<SimulationStatus> {
    let mut session = state.lock();
    session.start();
    Json(SimulationStatus {
        running: session.is_running(),
    })
}

/// `POST /simulation/pause` → clears the running flag.
pub async fn pause_simulation(State(state): State<Arc<AppState>>) -> Json<SimulationStatus> {
    let mut session = state.lock();
    session.pause();
    Json(SimulationStatus {
        running: session.is_running(),
    })
}

/// `GET /history` → samples, optionally filtered by cell and trimmed to the
/// most recent `limit`.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<HistoricalSample>> {
    let session = state.lock();
    let mut rows: Vec<HistoricalSample> = session
        .history()
        .iter()
        .filter(|h| query.cell_id.as_ref().is_none_or(|id| &h.cell_id == id))
        .cloned()
        .collect();
    if let Some(limit) = query.limit {
        let skip = rows.len().saturating_sub(limit);
        rows.drain(..skip);
    }
    Json(rows)
}

/// `DELETE /history` → drops history and resets the tick counter.
pub async fn clear_history(State(state): State<Arc<AppState>>) -> StatusCode {
    state.lock().clear_history();
    StatusCode::NO_CONTENT
}

/// `GET /tasks` → all tasks in insertion order.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.lock().tasks().tasks().to_vec())
}

/// `POST /tasks` → 201 + new id; invalid parameters → 400.
pub async fn add_task(
    State(state): State<Arc<AppState>>,
    Json(kind): Json<TaskKind>,
) -> Result<impl IntoResponse, ApiError> {
    let problems = kind.problems();
    if !problems.is_empty() {
        let msg = problems
            .iter()
            .map(|(field, message)| format!("`{field}` {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::BadRequest(msg));
    }
    let task_id = state.lock().add_task(kind);
    Ok((StatusCode::CREATED, Json(CreatedTask { task_id })))
}

/// `POST /tasks/{id}/start` → the started task, or 404.
pub async fn start_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let mut session = state.lock();
    session.start_task(&task_id)?;
    Ok(Json(session.tasks().get(&task_id)?.clone()))
}

/// `DELETE /tasks/{id}` → 204, or 404.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.lock().delete_task(&task_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /summary` → aggregate statistics.
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<Summary> {
    Json(state.lock().summary())
}

/// `GET /export/{kind}` → CSV download named `{kind}_{YYYYMMDD_HHMMSS}.csv`.
pub async fn export(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = ExportKind::from_name(&kind)
        .ok_or_else(|| ApiError::NotFound(format!("unknown export `{kind}`")))?;

    let mut body = Vec::new();
    write_csv(kind, &state.lock(), &mut body)?;

    let file_name = kind.file_name(chrono::Local::now().naive_local());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}
