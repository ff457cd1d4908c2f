use rps_types::UserId;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Username already exists: {username}")]
    DuplicateUsername { username: String },
    #[error("User {user_id} not found")]
    UserNotFound { user_id: UserId },
    #[error("Stats for user {user_id} not found")]
    StatsNotFound { user_id: UserId },
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PersistenceError {
    pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}
