/// Error types for every layer of the service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::routes::response::{ErrorCode, ResponseError};

pub type Result<T> = std::result::Result<T, ServerError>;

/// Failures raised by a `UserRepository`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Database(#[source] sqlx::Error),

    /// The store rejected a row that collides with a unique column (email).
    #[error("{0}")]
    UniqueViolation(String),
}

const PG_UNIQUE_VIOLATION: &str = "23505";

impl RepositoryError {
    /// Classify a driver error, keeping unique violations apart from the rest.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) =>
            {
                RepositoryError::UniqueViolation(db_err.message().to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}

/// Failures a handler reports to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    RequestTimeout(String),

    /// The server stopped waiting for this request during shutdown.
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::BadRequest(_) => ErrorCode::BadRequest,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::Internal(_) => ErrorCode::InternalServerError,
            ApiError::RequestTimeout(_) => ErrorCode::RequestTimeout,
            ApiError::Unavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

// Duplicate emails are reported like any other storage failure for now.
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ResponseError::single(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Fatal errors raised while starting or stopping the process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ServerError {
    fn from(err: config::ConfigError) -> Self {
        ServerError::Config(err.to_string())
    }
}
