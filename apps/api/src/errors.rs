use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request could not be analyzed. The body never carries a partial result.
    #[error("Analysis failed: {0}")]
    AnalysisFailure(#[from] JsonRejection),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::AnalysisFailure(rejection) => {
                tracing::warn!("Rejected analysis request: {rejection}");
                (
                    StatusCode::BAD_REQUEST,
                    "ANALYSIS_FAILED",
                    "The résumé could not be analyzed. Check the request body and try again."
                        .to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
