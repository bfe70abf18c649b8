//! Shared Diesel error mapping for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.message().to_owned())
}

/// Name the column behind a unique-constraint violation, if any.
///
/// PostgreSQL names single-column unique constraints `<table>_<column>_key`.
pub fn unique_violation_column(error: &DieselError) -> Option<String> {
    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = error else {
        return None;
    };
    let column = info
        .constraint_name()
        .and_then(|name| name.strip_suffix("_key"))
        .and_then(|name| name.rsplit('_').next())
        .or_else(|| info.column_name())
        .unwrap_or("value");
    Some(column.to_owned())
}

/// Map Diesel failures into query or connection errors.
///
/// Raw database messages are logged at debug level and never copied into
/// the returned error.
pub fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Mapping coverage for non-database variants.
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    #[rstest]
    #[case(DieselError::NotFound, Mapped::Query("record not found"))]
    #[case(DieselError::BrokenTransactionManager, Mapped::Connection("database connection error"))]
    #[case(DieselError::RollbackTransaction, Mapped::Query("database error"))]
    fn maps_variants(#[case] error: DieselError, #[case] expected: Mapped) {
        assert_eq!(
            map_diesel_error(error, Mapped::Query, Mapped::Connection),
            expected
        );
    }

    #[rstest]
    fn non_database_errors_have_no_unique_column() {
        assert_eq!(unique_violation_column(&DieselError::NotFound), None);
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), |message| message);
        assert_eq!(mapped, "timed out");
    }
}
