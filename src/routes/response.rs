/// Uniform response envelope
use serde::{Deserialize, Serialize};

/// Success body: `{"data": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseData<T> {
    pub data: T,
}

impl<T> ResponseData<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Failure body: `{"errors": [{"code": ..., "message": ...}]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseError {
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorItem {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    InternalServerError,
    RequestTimeout,
    ServiceUnavailable,
}

impl ResponseError {
    pub fn single(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorItem {
                code,
                message: message.into(),
            }],
        }
    }
}
