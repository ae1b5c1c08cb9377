use sqlx::error::ErrorKind;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load settings for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// The referenced record does not exist. An expected outcome, not a fault.
    #[error("{entity} {key} not found")]
    NotFound {
        entity: &'static str,
        key: NotFoundKey,
    },

    /// A uniqueness or integrity rule was rejected by the store.
    #[error("Constraint {constraint} violated: {message}")]
    ConstraintViolation { constraint: String, message: String },

    /// Any other storage-layer fault: connectivity, malformed rows, and so on.
    #[error("Database operation failed: {0}")]
    Store(#[source] sqlx::Error),
}

/// What the caller looked a missing record up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundKey {
    Id(i32),
    Data(String),
}

impl fmt::Display for NotFoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundKey::Id(id) => write!(f, "with id {id}"),
            NotFoundKey::Data(data) => write!(f, "'{data}'"),
        }
    }
}

impl DbError {
    pub fn employee_not_found(id: i32) -> Self {
        DbError::NotFound {
            entity: "employee",
            key: NotFoundKey::Id(id),
        }
    }

    pub fn phone_not_found(phone: &str) -> Self {
        DbError::NotFound {
            entity: "employee by phone",
            key: NotFoundKey::Data(phone.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation { .. })
    }
}

/// Classifies driver errors by their SQLSTATE kind, never by message text.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return DbError::ConstraintViolation {
                        constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                        message: db_err.message().to_string(),
                    };
                }
                _ => {}
            }
        }
        DbError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_name_the_lookup() {
        assert_eq!(
            DbError::employee_not_found(7).to_string(),
            "employee with id 7 not found"
        );
        assert_eq!(
            DbError::phone_not_found("+7701").to_string(),
            "employee by phone '+7701' not found"
        );
    }

    #[test]
    fn non_database_errors_are_store_errors() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Store(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn row_not_found_is_not_reclassified() {
        // Absence is detected explicitly by each query, so a stray RowNotFound is a fault.
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Store(_)));
    }
}
