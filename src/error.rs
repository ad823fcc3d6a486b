use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

use crate::nutrition::{AggregationError, MetricsError, ValidationError};

/// Failure of a request-level operation. Handlers return it as `(StatusCode, String)`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("metric not yet available: {0}")]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::BadRequest(_)
            | ServiceError::Aggregation(AggregationError::WindowOutOfRange { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Metrics(_) | ServiceError::Aggregation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for (StatusCode, String) {
    fn from(e: ServiceError) -> Self {
        let status = e.status();
        if status.is_server_error() {
            error!(error = ?e, "request failed");
        }
        (status, e.to_string())
    }
}
