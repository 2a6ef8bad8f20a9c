use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failures of a single annotator edit. The utterance is left untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No <{0}> tag found to remove")]
    NotFound(String),

    #[error("Speaker name cannot be empty")]
    InvalidName,

    #[error("Unsupported tag: {0}")]
    UnknownTag(String),

    #[error("Invalid value for {tag}.{attribute}: {reason}")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        reason: String,
    },
}

/// Failures of the synthesis collaborators and of the podcast flow.
#[derive(thiserror::Error, Debug)]
pub enum SynthesisError {
    #[error("Speech provider returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Speech provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid segment format: {0}")]
    InvalidSegment(String),

    #[error("Empty text for speaker: {0}")]
    EmptySegment(String),

    #[error("No voice ID provided for speaker: {0}")]
    MissingVoice(String),
}

#[derive(thiserror::Error, Debug)]
#[error("Invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Edit(EditError::InvalidSelection(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SELECTION")
            }
            AppError::Edit(EditError::NotFound(_)) => (StatusCode::NOT_FOUND, "TAG_NOT_FOUND"),
            AppError::Edit(EditError::InvalidName) => (StatusCode::BAD_REQUEST, "INVALID_NAME"),
            AppError::Edit(EditError::UnknownTag(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_TAG")
            }
            AppError::Edit(EditError::InvalidAttribute { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_ATTRIBUTE")
            }
            AppError::Synthesis(SynthesisError::InvalidSegment(_))
            | AppError::Synthesis(SynthesisError::EmptySegment(_))
            | AppError::Synthesis(SynthesisError::MissingVoice(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_TRANSCRIPT")
            }
            AppError::Synthesis(_) => (StatusCode::BAD_GATEWAY, "SYNTHESIS_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
