//! Feedback list handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use chrono::Utc;
use family_run::feedback::{FeedbackUpdate, NewFeedback};
use family_run::{FeedbackItem, FeedbackStatus, Priority, TrackerError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ApiError;
use crate::server::AppState;

/// Feedback list response
#[derive(Serialize)]
pub struct FeedbackListResponse {
    pub feedback_items: Vec<FeedbackItem>,
}

/// Single item response
#[derive(Serialize)]
pub struct ItemResponse {
    pub item: FeedbackItem,
}

/// Mutation response
#[derive(Serialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<FeedbackItem>,
}

/// Create request
#[derive(Deserialize)]
pub struct CreateFeedbackRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Update request; absent fields stay unchanged
#[derive(Deserialize)]
pub struct UpdateFeedbackRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parses an optional enum field. Blank counts as absent.
fn parse_field<T>(value: Option<&str>) -> Result<Option<T>, TrackerError>
where
    T: FromStr<Err = TrackerError>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// List all items in creation order
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FeedbackListResponse>, ApiError> {
    Ok(Json(FeedbackListResponse {
        feedback_items: state.feedback.list().await?,
    }))
}

/// Fetch one item
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    Ok(Json(ItemResponse {
        item: state.feedback.get(&id).await?,
    }))
}

/// Create an item
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError> {
    let Json(request) = payload?;

    let new = NewFeedback {
        kind: parse_field(request.kind.as_deref())?,
        priority: parse_field(request.priority.as_deref())?,
        title: request.title.unwrap_or_default(),
        description: request.description,
    };
    let now = state.clock.now().with_timezone(&Utc);
    let item = state.feedback.create(new, now).await?;

    Ok(Json(MutationResponse {
        success: true,
        item: Some(item),
    }))
}

/// Update an item's status, priority, title or description
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateFeedbackRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError> {
    let Json(request) = payload?;

    let fields: Result<(Option<FeedbackStatus>, Option<Priority>), TrackerError> =
        parse_field(request.status.as_deref()).and_then(|status| {
            parse_field(request.priority.as_deref()).map(|priority| (status, priority))
        });
    let (status, priority) = match fields {
        Ok(fields) => fields,
        Err(e) => {
            // An unknown id is reported before a bad value.
            state.feedback.get(&id).await?;
            return Err(e.into());
        },
    };

    let changes = FeedbackUpdate {
        status,
        priority,
        title: request.title,
        description: request.description,
    };
    let now = state.clock.now().with_timezone(&Utc);
    let item = state.feedback.update(&id, changes, now).await?;

    Ok(Json(MutationResponse {
        success: true,
        item: Some(item),
    }))
}

/// Delete an item
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    state.feedback.delete(&id).await?;
    Ok(Json(MutationResponse {
        success: true,
        item: None,
    }))
}
