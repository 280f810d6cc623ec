//! Tracker server implementation

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use family_run::storage::file::JsonFileBackend;
use family_run::{Clock, FeedbackStore, RunLog, SystemClock, TrackerConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers;

/// Shared application state
pub struct AppState {
    pub runs: RunLog,
    pub feedback: FeedbackStore,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// State over the given stores and clock.
    pub fn new(runs: RunLog, feedback: FeedbackStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            runs,
            feedback,
            clock,
        }
    }

    /// File-backed state for a deployment, using the wall clock.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(
            RunLog::new(JsonFileBackend::new(config.runs_path()), config.members.clone()),
            FeedbackStore::new(JsonFileBackend::new(config.feedback_path())),
            Arc::new(SystemClock),
        )
    }
}

/// Builds the API router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/data", get(handlers::runs::get_data))
        .route("/api/add-run", post(handlers::runs::add_run))
        .route("/api/members", get(handlers::status::members))
        .route("/api/status", get(handlers::status::status))
        .route(
            "/api/feedback",
            get(handlers::feedback::list).post(handlers::feedback::create),
        )
        .route(
            "/api/feedback/{id}",
            get(handlers::feedback::get)
                .put(handlers::feedback::update)
                .delete(handlers::feedback::delete),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Family run tracker server
pub struct TrackerServer;

impl TrackerServer {
    /// Start the server and run until interrupted.
    pub async fn start(config: TrackerConfig) -> Result<()> {
        let state = Arc::new(AppState::from_config(&config));
        let app = router(state);

        let listener = TcpListener::bind(config.bind)
            .await
            .with_context(|| format!("failed to bind {}", config.bind))?;

        info!(
            bind = %config.bind,
            runs = %config.runs_path().display(),
            feedback = %config.feedback_path().display(),
            members = ?config.members,
            "family run tracker listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
