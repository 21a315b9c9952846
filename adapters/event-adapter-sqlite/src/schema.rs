//! Database schema initialization and migrations

use sqlx::{Sqlite, SqlitePool, Transaction};

use watchdog_types::prelude::*;

/// Get the current database version from vars table, 0 for a fresh database
async fn get_db_version(tx: &mut Transaction<'_, Sqlite>) -> Result<i64, sqlx::Error> {
	let value = sqlx::query_scalar::<_, String>("SELECT value FROM vars WHERE key = 'db_version'")
		.fetch_optional(&mut **tx)
		.await?;

	match value {
		Some(v) => v.parse().map_err(|err| sqlx::Error::Decode(Box::new(err))),
		None => Ok(0),
	}
}

/// Set the database version in vars table
async fn set_db_version(
	tx: &mut Transaction<'_, Sqlite>,
	version: i64,
) -> Result<(), sqlx::Error> {
	sqlx::query(
		"INSERT OR REPLACE INTO vars (key, value, updated_at) VALUES ('db_version', ?, unixepoch())",
	)
	.bind(version.to_string())
	.execute(&mut **tx)
	.await?;

	Ok(())
}

// Current schema version - update this when adding new migrations
const CURRENT_DB_VERSION: i64 = 1;

/// Initialize the database schema and run migrations
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS vars (
		key text NOT NULL,
		value text NOT NULL,
		created_at INTEGER DEFAULT (unixepoch()),
		updated_at INTEGER DEFAULT (unixepoch()),
		PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;

	let version = get_db_version(&mut tx).await?;

	// Events
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS watchdog_events (
			event_id INTEGER PRIMARY KEY AUTOINCREMENT,
			action text NOT NULL,
			kind text NOT NULL,
			ip_address text,
			session_id text,
			created_at INTEGER NOT NULL DEFAULT (unixepoch()),
			CHECK (ip_address IS NOT NULL OR session_id IS NOT NULL)
		)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_watchdog_events_lookup \
		ON watchdog_events (action, kind, created_at)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_watchdog_events_created_at ON watchdog_events (created_at)",
	)
	.execute(&mut *tx)
	.await?;

	if version < CURRENT_DB_VERSION {
		info!("Initialized watchdog event schema (version {})", CURRENT_DB_VERSION);
		set_db_version(&mut tx, CURRENT_DB_VERSION).await?;
	}

	tx.commit().await?;

	Ok(())
}


// vim: ts=4
