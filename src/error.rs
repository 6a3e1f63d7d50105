use sqlx::Error as SqlxError;
use std::sync::Arc;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CastorError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] figment::Error),

    #[error("Failed to initialize table {table}: {source}")]
    TableInit {
        table: String,
        #[source]
        source: SqlxError,
    },
}

/// Destination for failures raised off the caller's path (GC ticks,
/// unreadable payload blobs). Installed once at build time; write-only.
pub type ErrorSink = Arc<dyn Fn(&CastorError) + Send + Sync>;

pub(crate) fn default_sink() -> ErrorSink {
    Arc::new(|e| tracing::error!(error = %e, "token storage background failure"))
}
