use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Lifts integrity-constraint failures (SQLSTATE class 23) out of the
    /// generic database variant so callers can tell a rejected row from a
    /// broken connection.
    pub(crate) fn classify(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error
                .code()
                .as_deref()
                .is_some_and(|code| code.starts_with("23"))
            {
                return StorageError::ConstraintViolation(db_error.message().to_string());
            }
        }
        StorageError::Database(error)
    }
}
