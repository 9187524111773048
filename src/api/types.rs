//! API request, response and error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::cells::Chemistry;
use crate::error::SimError;

/// Body of `POST /cells`.
#[derive(Debug, Deserialize)]
pub struct CreateCellsRequest {
    /// `"LFP"` or `"NMC"`.
    pub chemistry: Chemistry,
    /// Number of cells to add (1..=20).
    pub count: usize,
}

/// Ids of cells created by `POST /cells`.
#[derive(Debug, Serialize)]
pub struct CreatedCells {
    pub cell_ids: Vec<String>,
}

/// Id of a task created by `POST /tasks`.
#[derive(Debug, Serialize)]
pub struct CreatedTask {
    pub task_id: String,
}

/// Result of a manual `POST /simulation/tick`.
#[derive(Debug, Serialize)]
pub struct TickResponse {
    /// Samples recorded by this tick.
    pub samples: usize,
    /// Tick counter after the tick.
    pub tick: u64,
}

/// Running flag after `POST /simulation/{start,pause}`.
#[derive(Debug, Serialize)]
pub struct SimulationStatus {
    pub running: bool,
}

/// Optional filters for `GET /history`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Only samples of this cell.
    pub cell_id: Option<String>,
    /// Only the most recent `limit` samples (after filtering).
    pub limit: Option<usize>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Handler error mapped onto an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<SimError> for ApiError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::CellNotFound(_) | SimError::TaskNotFound(_) => Self::NotFound(e.to_string()),
            SimError::Io(_) | SimError::Csv(_) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_map_to_404() {
        let e = ApiError::from(SimError::TaskNotFound("task_3".into()));
        assert!(matches!(&e, ApiError::NotFound(msg) if msg == "task not found: task_3"));
        assert_eq!(e.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn io_errors_map_to_500() {
        let e = ApiError::from(SimError::Io(std::io::Error::other("boom")));
        assert_eq!(e.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn create_cells_request_parses() {
        let req: CreateCellsRequest =
            serde_json::from_str(r#"{"chemistry":"NMC","count":3}"#).unwrap();
        assert_eq!(req.chemistry, Chemistry::Nmc);
        assert_eq!(req.count, 3);
    }
}
