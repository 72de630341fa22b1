use streakkeeper_domain::shared::DomainError;

/// Maps sqlx failures onto domain errors
pub struct RepositoryErrorMapper;

impl RepositoryErrorMapper {
    pub fn map_sqlx_error(error: sqlx::Error, context: &str) -> DomainError {
        match &error {
            sqlx::Error::Database(db_error)
                if db_error.is_unique_violation() || db_error.is_foreign_key_violation() =>
            {
                DomainError::ConstraintViolation(format!("{}: {}", context, db_error))
            }
            _ => DomainError::Repository(format!("{}: {}", context, error)),
        }
    }
}

/// Extension trait for Result types to simplify error handling
pub trait ResultExt<T, E> {
    /// Convert error to DomainError::Infrastructure
    /// Usage: `result.to_infra_err()?`
    fn to_infra_err(self) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn to_infra_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(e.to_string()))
    }
}
