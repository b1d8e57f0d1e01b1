//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidInput`] thrown when a request is malformed or breaks a field rule.
//! - [`KeyNotFound`] thrown when a record is not found.
//! - [`ProtectedRecord`] thrown on a direct mutation of a tithe record.
//! - [`Conflict`] thrown when a concurrent writer got there first.
//! - [`Database`] thrown when the store fails or aborts the transaction.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ProtectedRecord`]: EngineError::ProtectedRecord
//!  [`Conflict`]: EngineError::Conflict
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Protected record: {0}")]
    ProtectedRecord(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Turn SQLite lock contention into [`EngineError::Conflict`].
    ///
    /// Transactions start deferred: when two writers read the same row, the
    /// one that upgrades its lock second gets `SQLITE_BUSY` (or
    /// `SQLITE_LOCKED`). Its read is stale, same as a failed compare-and-swap.
    pub(crate) fn contention_as_conflict(self) -> Self {
        match self {
            Self::Database(err) if is_lock_contention(&err) => {
                Self::Conflict(format!("record was modified concurrently ({err})"))
            }
            other => other,
        }
    }
}

fn is_lock_contention(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("database is locked") || message.contains("database table is locked")
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ProtectedRecord(a), Self::ProtectedRecord(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_database_is_a_conflict() {
        let busy = EngineError::Database(DbErr::Custom(
            "error returned from database: (code: 5) database is locked".to_string(),
        ));
        assert!(matches!(busy.contention_as_conflict(), EngineError::Conflict(_)));

        let locked = EngineError::Database(DbErr::Custom(
            "(code: 6) database table is locked".to_string(),
        ));
        assert!(matches!(locked.contention_as_conflict(), EngineError::Conflict(_)));
    }

    #[test]
    fn other_errors_pass_through() {
        let missing = EngineError::Database(DbErr::Custom("no such table: expenses".to_string()));
        assert!(matches!(missing.contention_as_conflict(), EngineError::Database(_)));
        assert_eq!(
            EngineError::KeyNotFound("x".to_string()).contention_as_conflict(),
            EngineError::KeyNotFound("x".to_string())
        );
    }
}
