//! Unified error types for Faultline.
//! Used by: telemetry, outcome, store, handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const DATABASE_ERROR: &str = "Database error occurred";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("simulated database error")]
    Simulated,

    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("store task failed: {0}")]
    StoreTask(String),

    #[error("delay interrupted: {0}")]
    DelayInterrupted(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("metric already registered: {0}")]
    DuplicateMetric(String),

    #[error("metrics error: {0}")]
    Metrics(prometheus::Error),
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        match err {
            prometheus::Error::AlreadyReg => Error::DuplicateMetric("collector descriptor".into()),
            other => Error::Metrics(other),
        }
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidBody(_) | Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::Simulated
            | Error::Store(_)
            | Error::StoreTask(_)
            | Error::DelayInterrupted(_)
            | Error::DuplicateMetric(_)
            | Error::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing envelope. Causes stay in the logs.
    pub fn envelope(&self) -> serde_json::Value {
        match self {
            Error::Simulated => json!({ "message": DATABASE_ERROR }),
            Error::Store(_) | Error::StoreTask(_) => json!({ "error": DATABASE_ERROR }),
            Error::DelayInterrupted(reason) => {
                json!({ "error": format!("Error during timeout: {}", reason) })
            }
            Error::InvalidBody(_) => json!({ "error": "Invalid request body" }),
            Error::InvalidPath(_) => json!({ "error": "Invalid path parameter" }),
            Error::DuplicateMetric(_) | Error::Metrics(_) => json!({ "error": "Internal error" }),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
