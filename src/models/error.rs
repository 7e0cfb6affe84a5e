use serde::Serialize;
use actix_web::{HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Who can fix a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An operator has to fix the service configuration.
    Configuration,
    /// The end user sent bad input.
    Input,
    /// Encoder or renderer fault; nothing the caller can fix.
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixError {
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Recipient key is not configured")]
    MissingKey,

    #[error("Recipient key too short: {len} characters (minimum {min})")]
    KeyTooShort { len: usize, min: usize },

    #[error("Recipient key is unusable: {0}")]
    InvalidKey(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Field {tag} too long: {len} characters (maximum {max})")]
    FieldTooLong { tag: String, len: usize, max: usize },

    #[error("Non-ASCII character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Checksum mismatch: payload carries {found}, computed {expected}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("Render failure: {0}")]
    RenderFailure(String),
}

impl PixError {
    /// Stable machine-readable code exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            PixError::MissingKey | PixError::KeyTooShort { .. } | PixError::InvalidKey(_) => {
                "CHAVE_NAO_CONFIGURADA"
            }
            PixError::InvalidAmount(_) => "VALOR_INVALIDO",
            PixError::InvalidReference(_) => "REFERENCIA_INVALIDA",
            PixError::FieldTooLong { .. }
            | PixError::InvalidCharacter { .. }
            | PixError::MalformedPayload(_)
            | PixError::ChecksumMismatch { .. }
            | PixError::RenderFailure(_) => "ERRO_GERACAO_PIX",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PixError::MissingKey | PixError::KeyTooShort { .. } | PixError::InvalidKey(_) => {
                ErrorKind::Configuration
            }
            PixError::InvalidAmount(_) | PixError::InvalidReference(_) => ErrorKind::Input,
            _ => ErrorKind::Internal,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Pix(PixError),
    ValidationError(String),
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::Pix(e) => write!(f, "{}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<PixError> for ApiError {
    fn from(err: PixError) -> Self {
        ApiError::Pix(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Pix(e) => match e.kind() {
                ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Input => StatusCode::BAD_REQUEST,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Pix(e) => {
                HttpResponse::build(self.status_code()).json(ErrorResponse {
                    code: e.code().to_string(),
                    message: match e.kind() {
                        ErrorKind::Configuration => {
                            "Chave PIX não configurada ou inválida. Contate o administrador do sistema.".to_string()
                        }
                        _ => format!("Erro ao gerar código PIX: {}", e),
                    },
                    details: Some(format!("{:?}", e.kind()).to_lowercase()),
                })
            }
            ApiError::ValidationError(_) => {
                HttpResponse::BadRequest().json(ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: self.to_string(),
                    details: None,
                })
            }
            ApiError::InternalError(_) => {
                HttpResponse::InternalServerError().json(ErrorResponse {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "Internal server error".to_string(),
                    details: None,
                })
            }
        }
    }
}
