pub mod memory_ledger_repo;
pub mod memory_venue_repo;
pub mod postgres_ledger_repo;
pub mod postgres_venue_repo;
pub mod sqlite_ledger_repo;
pub mod sqlite_venue_repo;

use crate::error::AppError;

// 2067 = SQLite Unique Constraint, 1555 = SQLite Primary Key,
// 23505 = PostgreSQL Unique Violation
pub(crate) fn claim_conflict(e: sqlx::Error, hour: u32) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        let code = db_err.code().unwrap_or_default();
        if code == "2067" || code == "1555" || code == "23505" {
            return AppError::Conflict(format!("Slot {}:00 is already booked", hour));
        }
    }

    AppError::Database(e)
}
