//! PostgreSQL Repository Implementations

mod food_journal_repository;
mod vitals_repository;

pub use food_journal_repository::PgFoodJournalRepository;
pub use vitals_repository::PgVitalsRepository;

use buddy::DomainError;

/// Map a sqlx error, marking connection-level failures as retryable
pub(crate) fn map_sqlx(error: sqlx::Error) -> DomainError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DomainError::Unavailable(error.to_string())
        }
        other => DomainError::Repository(other.to_string()),
    }
}
