//! Shared Diesel and pool error mapping for the repositories.
//!
//! Every repository port error has the same two-way split: the database could
//! not be reached, or a statement failed. [`RepositoryFailure`] lets one pair
//! of mapping functions serve all of them.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{ScanRepositoryError, UsageStatsRepositoryError, UserPersistenceError};

use super::pool::PoolError;

/// Repository error with connection and query variants.
pub(crate) trait RepositoryFailure {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
}

macro_rules! impl_repository_failure {
    ($($error:ty),* $(,)?) => {
        $(
            impl RepositoryFailure for $error {
                fn connection(message: String) -> Self {
                    <$error>::connection(message)
                }

                fn query(message: String) -> Self {
                    <$error>::query(message)
                }
            }
        )*
    };
}

impl_repository_failure!(ScanRepositoryError, UsageStatsRepositoryError, UserPersistenceError);

/// Map a pool checkout or build failure to a connection error.
pub(crate) fn map_pool_error<E: RepositoryFailure>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection(message)
}

/// Map a Diesel failure, keeping driver detail out of the message.
pub(crate) fn map_diesel_error<E: RepositoryFailure>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            E::query("duplicate record".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            E::query("referenced record is missing".to_owned())
        }
        _ => E::query("database error".to_owned()),
    }
}
