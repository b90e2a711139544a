use crate::db::bootstrap;
use crate::lab::{self, Attack, AttackInput, AttackReport, Mode};
use crate::router::LabState;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct LabRequest {
    pub mode: Mode,
    #[serde(flatten)]
    pub input: AttackInput,
}

#[derive(Debug, Serialize)]
pub struct ResetResult {
    pub success: bool,
    pub message: String,
}

/// POST /api/lab/{attack}
pub async fn run_attack(
    State(state): State<LabState>,
    Path(attack): Path<Attack>,
    Json(request): Json<LabRequest>,
) -> Json<AttackReport> {
    let report = match request.mode {
        Mode::Vulnerable => lab::run(&state.vulnerable, request.mode, attack, &request.input).await,
        Mode::Secure => lab::run(&state.secure, request.mode, attack, &request.input).await,
    };
    Json(report)
}

/// POST /api/lab/reset -> drops, recreates and reseeds both tables.
pub async fn reset_database(State(state): State<LabState>) -> Json<ResetResult> {
    match bootstrap::reset(&state.provider).await {
        Ok(()) => Json(ResetResult {
            success: true,
            message: "Database reset to fixture state.".to_string(),
        }),
        Err(e) => {
            warn!(error = %e, "database reset failed");
            Json(ResetResult {
                success: false,
                message: format!("Database reset failed: {e}"),
            })
        }
    }
}
