//! HTTP API for the gradebook.
//!
//! # Endpoints
//!
//! - GET /health - Liveness check
//! - POST /assessments - Create an assessment
//! - GET /assessments - List assessments ordered by due date
//! - GET /assessments/:id - Get one assessment
//! - PUT /assessments/:id - Patch an assessment
//! - DELETE /assessments/:id - Delete an assessment
//! - GET /stats/current - Current weighted grade
//! - GET /stats/what-if?target= - Required average for a target grade
//! - GET /stats/validate - Weight allocation check

pub mod config;
pub mod error;
pub mod http;

use gradebook_core::db::open_db;
use gradebook_core::{AssessmentService, RepoResult, SqliteAssessmentRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use http::create_router;

/// State shared across handlers.
///
/// Holds configuration only; every request opens its own connection.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db_path: PathBuf,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Runs one unit of store work on the blocking pool.
    ///
    /// A fresh connection is opened and dropped per call.
    pub(crate) async fn with_service<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&AssessmentService<SqliteAssessmentRepository<'_>>) -> RepoResult<T>
            + Send
            + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open_db(&db_path)?;
            let service = AssessmentService::new(SqliteAssessmentRepository::try_new(&conn)?);
            f(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("blocking task failed: {err}")))?
    }
}

/// Fatal server startup/runtime failures.
#[derive(Debug)]
pub enum ServerError {
    Bind {
        addr: String,
        source: std::io::Error,
    },
    Database(gradebook_core::db::DbError),
    /// The startup database check panicked or was cancelled.
    Bootstrap(tokio::task::JoinError),
    Serve(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "failed to bind to {addr}: {source}"),
            Self::Database(err) => write!(f, "failed to open database: {err}"),
            Self::Bootstrap(err) => write!(f, "database bootstrap task failed: {err}"),
            Self::Serve(err) => write!(f, "server error: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bind { source, .. } => Some(source),
            Self::Database(err) => Some(err),
            Self::Bootstrap(err) => Some(err),
            Self::Serve(err) => Some(err),
        }
    }
}

/// Serves the API until `shutdown` resolves.
///
/// The database is opened once up front so schema problems fail startup
/// instead of the first request.
pub async fn serve(
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let db_path = config.db_path.clone();
    tokio::task::spawn_blocking(move || open_db(&db_path).map(drop))
        .await
        .map_err(ServerError::Bootstrap)?
        .map_err(ServerError::Database)?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr.to_string(),
            source,
        })?;

    let app = create_router(Arc::new(AppState::new(config.db_path.clone())));
    info!(
        "event=server_start module=http status=ok addr={} db_path={}",
        config.addr,
        config.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("event=server_stop module=http status=ok");
        })
        .await
        .map_err(|err| {
            error!("event=server_stop module=http status=error error={err}");
            ServerError::Serve(err)
        })
}
