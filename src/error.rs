//! Error types for process-level concerns.
//!
//! Business-rule failures live in [`crate::reservations::ReservationError`]
//! and dispatch failures in [`crate::dispatch::DispatchError`]; neither is
//! ever surfaced as a process error.

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("PORT environment variable must be a number")]
    InvalidPort(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// HTTP server lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server startup failed: {reason}")]
    StartupFailed { reason: String },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Logging setup errors.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open payload log {path}: {source}")]
    PayloadLog {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}
