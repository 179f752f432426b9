use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::forecast::ForecastError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Training(ForecastError),
    #[error("{0}")]
    Prediction(ForecastError),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Training(e) | AppError::Prediction(e) if e.is_caller_error() => {
                StatusCode::OK
            }
            AppError::Training(_) | AppError::Prediction(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::InvalidInput(msg) => json!({ "error": msg }),
            AppError::Training(e) => json!({ "status": "fail", "message": e.to_string() }),
            AppError::Prediction(e) => {
                json!({ "status": "failed", "result": [], "message": e.to_string() })
            }
            AppError::InternalServerError(msg) => json!({ "status": "fail", "message": msg }),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("Failed to parse the request body: {err}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalServerError(format!("Background task failed: {err}"))
    }
}
