//! Control surface handlers.
//!
//! Argument parsing mirrors the daemon's request contract: `timeout`
//! defaults to -1 ("do not schedule"), `name`/`value` default to empty.
//! A malformed `timeout` is rejected by the extractor with 400 before any
//! state mutation or provider call.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::shutdown::ArmError;

#[derive(Deserialize)]
pub struct AddParams {
    #[serde(default = "default_timeout")]
    timeout: i64,
}

fn default_timeout() -> i64 {
    -1
}

#[derive(Deserialize)]
pub struct MetadataParams {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub pending_shutdowns: usize,
}

/// POST /shutdown/add — arm a termination timer.
pub async fn add_shutdown(
    State(state): State<AppState>,
    Query(params): Query<AddParams>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.controller.add_shutdown(params.timeout) {
        Ok(_) => Ok(StatusCode::OK),
        Err(error) => {
            tracing::warn!(timeout = params.timeout, error = %error, "rejecting shutdown request");
            let status = match error {
                ArmError::AlreadyArmed => StatusCode::CONFLICT,
                ArmError::DurationTooLong => StatusCode::BAD_REQUEST,
            };
            Err((status, error.to_string()))
        }
    }
}

/// POST /shutdown/cancelAll — cancel every pending timer.
pub async fn cancel_all_shutdowns(State(state): State<AppState>) -> String {
    let cancelled = state.controller.cancel_all_shutdowns();
    format!("cancelled: {}\n", cancelled)
}

/// GET /shutdown/list — text block per pending timer.
pub async fn list_shutdowns(State(state): State<AppState>) -> String {
    state.controller.render_shutdowns()
}

/// POST /metadata/set — set one metadata entry on this instance.
pub async fn set_metadata(
    State(state): State<AppState>,
    Query(params): Query<MetadataParams>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.controller.set_metadata(&params.name, &params.value).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(error) => {
            tracing::warn!(name = %params.name, error = %error, "metadata update failed");
            Err((StatusCode::BAD_GATEWAY, error.to_string()))
        }
    }
}

/// GET /status — daemon health summary.
pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        pending_shutdowns: state.controller.list_shutdowns().len(),
    })
}
