// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Verifier process failed: {0}")]
    ProcessFailure(String),

    #[error("Malformed verifier output: {0}")]
    MalformedOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlaygroundError>;

impl ResponseError for PlaygroundError {
    fn status_code(&self) -> StatusCode {
        match self {
            PlaygroundError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Only the request kind is echoed back; internal details stay in the log.
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            PlaygroundError::InvalidRequest(_) => "invalid request",
            _ => "internal error",
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
