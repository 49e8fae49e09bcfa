use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{LogResponse, RemovalNotice, TrailPayload, TRAILS_REMOVED_TABLE, TRAILS_TABLE};
use tower_http::cors::CorsLayer;

use crate::storage::LogRecord;
use crate::AppState;

const MAX_TABLE_NAME: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl IntoResponse for LogError {
    fn into_response(self) -> Response {
        let status = match self {
            LogError::InvalidTable(_) => StatusCode::BAD_REQUEST,
            LogError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/log/{table}", get(list_records).post(log))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Store one record in `table`
pub async fn log(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<LogResponse>), LogError> {
    check_table(&table)?;
    validate(&table, &payload)?;
    let id = state.store.append(&table, payload).await;
    let count = state.store.count(&table).await;
    tracing::info!("logged {id} in {table} ({count} records)");
    Ok((StatusCode::CREATED, Json(LogResponse { id, table })))
}

/// Every record of `table`, oldest first
pub async fn list_records(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<Vec<LogRecord>>, LogError> {
    check_table(&table)?;
    Ok(Json(state.store.records(&table).await))
}

fn check_table(table: &str) -> Result<(), LogError> {
    let valid = !table.is_empty()
        && table.len() <= MAX_TABLE_NAME
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(LogError::InvalidTable(table.to_string()))
    }
}

/// Known tables get their payload shape checked; others are stored as-is
fn validate(table: &str, payload: &Value) -> Result<(), LogError> {
    let invalid = |e: serde_json::Error| LogError::InvalidPayload(e.to_string());
    match table {
        TRAILS_TABLE => {
            let trail = TrailPayload::deserialize(payload).map_err(invalid)?;
            let points = trail.points().map_err(invalid)?;
            if points.len() < 2 {
                return Err(LogError::InvalidPayload(format!(
                    "a trail needs at least 2 points, got {}",
                    points.len()
                )));
            }
            if !trail.comp_length.is_finite() || trail.comp_length < 0.0 {
                return Err(LogError::InvalidPayload(format!(
                    "bad length {}",
                    trail.comp_length
                )));
            }
            Ok(())
        }
        TRAILS_REMOVED_TABLE => {
            RemovalNotice::deserialize(payload).map_err(invalid)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
