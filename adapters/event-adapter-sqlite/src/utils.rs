//! Utility functions for database operations

use watchdog_types::prelude::*;

/// Log database errors
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a driver error to the store error taxonomy
pub(crate) fn db_err(err: sqlx::Error) -> Error {
	inspect(&err);
	match err {
		sqlx::Error::PoolTimedOut => Error::Timeout,
		_ => Error::DbError,
	}
}

// vim: ts=4
