//! Family Run HTTP server
//!
//! JSON API over the run log and the feedback list.
//!
//! # Endpoints
//!
//! - `GET /api/data` - all weeks with per-member totals, plus the current week
//! - `POST /api/add-run` - log a run for the current week
//! - `GET /api/members` - the configured family members
//! - `GET|POST /api/feedback` - list or create feedback items
//! - `GET|PUT|DELETE /api/feedback/{id}` - read, update or delete one item
//! - `GET /api/status` - liveness and version
//!
//! Failures answer with `{"error": "..."}`.

mod error;
mod handlers;
mod server;

pub use error::ApiError;
pub use server::{router, AppState, TrackerServer};
