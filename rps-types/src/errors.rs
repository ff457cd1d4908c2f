use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Body of every failed API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ApiErrorKind {
    DuplicateUsername,
    InvalidInput,
    NotFound,
    InternalError,
}

impl ApiErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiErrorKind::DuplicateUsername | ApiErrorKind::InvalidInput => 400,
            ApiErrorKind::NotFound => 404,
            ApiErrorKind::InternalError => 500,
        }
    }
}
