use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Ошибки редактора и сервиса плана рассадки.
#[derive(Debug, Error)]
pub enum SeatingError {
    /// Пустая или некорректная метка ряда/места.
    #[error("invalid seat address: {0}")]
    InvalidAddress(String),

    /// Диапазон нельзя развернуть в последовательность мест.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Ошибка сети или ответ сервиса с кодом ошибки.
    #[error("request failed{}: {}", status_suffix(.status), .message)]
    RequestFailure {
        status: Option<u16>,
        message: String,
    },

    #[error("section '{0}' not found")]
    SectionNotFound(String),

    #[error("no section is open")]
    NoSectionOpen,

    #[error("section '{0}' already exists")]
    SectionExists(String),

    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("invalid project name: {0}")]
    InvalidProjectName(String),

    #[error("storage error: {0}")]
    Storage(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" with status {}", s))
        .unwrap_or_default()
}

impl SeatingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidAddress(_)
            | Self::InvalidRange(_)
            | Self::InvalidProjectName(_)
            | Self::NoSectionOpen => StatusCode::BAD_REQUEST,
            Self::SectionNotFound(_) | Self::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            Self::SectionExists(_) => StatusCode::CONFLICT,
            Self::RequestFailure { .. } => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for SeatingError {
    fn from(e: reqwest::Error) -> Self {
        Self::RequestFailure {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for SeatingError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for SeatingError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl IntoResponse for SeatingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
