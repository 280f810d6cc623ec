//! Run log handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use family_run::runlog::{parse_distance, RunOverview};
use family_run::WeekKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::server::AppState;

/// All weeks, newest first, with the current week
pub async fn get_data(State(state): State<Arc<AppState>>) -> Result<Json<RunOverview>, ApiError> {
    let today = state.clock.now().date_naive();
    Ok(Json(state.runs.overview(today).await?))
}

/// Add-run request.
///
/// Both fields are loose JSON so that a wrong type is reported as an invalid
/// member or distance rather than a malformed body.
#[derive(Deserialize)]
pub struct AddRunRequest {
    #[serde(default)]
    pub member: Value,
    #[serde(default)]
    pub km: Value,
}

/// Add-run response
#[derive(Serialize)]
pub struct AddRunResponse {
    pub success: bool,
    pub week: WeekKey,
}

/// Record a run for the current week
pub async fn add_run(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddRunRequest>, JsonRejection>,
) -> Result<Json<AddRunResponse>, ApiError> {
    let Json(request) = payload?;

    let member = request.member.as_str().unwrap_or_default();
    state.runs.check_member(member)?;
    let km = parse_distance(&request.km)?;

    let today = state.clock.now().date_naive();
    let week = state.runs.add_run(member, km, today).await?;

    Ok(Json(AddRunResponse {
        success: true,
        week,
    }))
}
