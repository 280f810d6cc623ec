//! Liveness and member listing

use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::server::AppState;

/// Members response
#[derive(Serialize)]
pub struct MembersResponse {
    pub members: Vec<String>,
}

/// List the configured family members in display order
pub async fn members(State(state): State<Arc<AppState>>) -> Json<MembersResponse> {
    Json(MembersResponse {
        members: state.runs.members().to_vec(),
    })
}

/// Status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub members: usize,
}

/// Report that the server is up
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        members: state.runs.members().len(),
    })
}
