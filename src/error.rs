use crate::bulk::BulkError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::validate::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("bulk error: {0}")]
    Bulk(#[from] BulkError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// リクエスト本文を解釈できない
    #[error("{0}")]
    MalformedInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Catalog(_)
            | AppError::Bulk(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors_with_verbatim_message() {
        let err = AppError::from(ValidationError::UnknownQuestion { question_id: 999 });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid question ID: 999");
    }

    #[test]
    fn startup_errors_are_server_errors() {
        let err = AppError::from(CatalogError::DuplicateQuestion { id: 3 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
