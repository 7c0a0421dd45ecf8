use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{models::ErrorResponse, server::cors};

pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to generate image";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Missing {0} in request body")]
    MissingFields(String),
    #[error("Invalid image model ID: {0}")]
    UnknownModel(String),
    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("Failed to read request body: {0}")]
    Payload(String),
    #[error("{0}")]
    Config(String),
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("{0}")]
    Request(String),
    #[error("{0}")]
    Response(String),
    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    /// Builds the error for a non-2xx upstream reply, falling back to a
    /// status-bearing message when upstream gave none.
    pub fn upstream(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Image generation failed with status: {}", status));
        ProxyError::Upstream { status, message }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProxyError::MethodNotAllowed
                | ProxyError::MissingFields(_)
                | ProxyError::UnknownModel(_)
                | ProxyError::PayloadTooLarge(_)
                | ProxyError::Payload(_)
        )
    }

    /// The message placed in the `error` field of the JSON body.
    pub fn public_message(&self) -> String {
        let message = self.to_string();
        if message.is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::MissingFields(_) | ProxyError::UnknownModel(_) | ProxyError::Payload(_) => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Config(_)
            | ProxyError::Upstream { .. }
            | ProxyError::Request(_)
            | ProxyError::Response(_)
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        cors::with_cors(HttpResponse::build(self.status_code())).json(ErrorResponse {
            error: self.public_message(),
        })
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
