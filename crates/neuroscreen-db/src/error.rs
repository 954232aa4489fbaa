//! Database error types.

use neuroscreen_common::ApiError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// A business rule refused the change (e.g. removing the last administrator).
    #[error("{0}")]
    Guard(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DbError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return DbError::Validation(format!("referenced record does not exist ({})", db_err.message()));
            }
            if db_err.is_check_violation() {
                return DbError::Validation(db_err.message().to_string());
            }
        }
        DbError::Sqlx(err)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg)   => ApiError::NotFound(msg),
            DbError::Duplicate(msg)  => ApiError::Conflict(msg),
            DbError::Validation(msg) => ApiError::BadRequest(msg),
            DbError::Guard(msg)      => ApiError::Conflict(msg),
            DbError::Sqlx(e)         => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_mapping() {
        assert!(matches!(ApiError::from(DbError::NotFound("x".into())), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from(DbError::Duplicate("x".into())), ApiError::Conflict(_)));
        assert!(matches!(ApiError::from(DbError::Validation("x".into())), ApiError::BadRequest(_)));
        assert!(matches!(ApiError::from(DbError::Sqlx(sqlx::Error::RowNotFound)), ApiError::Internal(_)));
    }
}
