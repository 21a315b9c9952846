//! SQLite event store for the watchdog.
//!
//! Events live in a single `watchdog_events` table indexed on
//! `(action, kind, created_at)`, so windowed counts stay cheap as the table
//! grows. Nothing is expired automatically; schedule [`EventStore::purge`]
//! if the table should be bounded.

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use watchdog_types::{event_store::EventStore, prelude::*, types::Event};

mod event;
mod schema;
mod utils;

use utils::inspect;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct EventAdapterSqlite {
	db: SqlitePool,
	/// Last assigned timestamp, keeps timestamps non-decreasing
	last_ts: AtomicI64,
}

impl EventAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> WdResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.acquire_timeout(ACQUIRE_TIMEOUT)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

		schema::init_db(&db).await.inspect_err(inspect).or(Err(Error::DbError))?;

		Ok(Self { db, last_ts: AtomicI64::new(0) })
	}

	fn next_timestamp(&self) -> Timestamp {
		let now = Timestamp::now().0;
		let prev = self.last_ts.fetch_max(now, Ordering::SeqCst);
		Timestamp(now.max(prev))
	}
}

#[async_trait]
impl EventStore for EventAdapterSqlite {
	async fn insert(&self, action: &str, kind: EventKind, identity: &Identity) -> WdResult<()> {
		event::insert(&self.db, action, kind, identity, self.next_timestamp()).await
	}

	async fn count(
		&self,
		action: &str,
		kind: EventKind,
		identity: &Identity,
		window_minutes: u32,
	) -> WdResult<u32> {
		let since = Timestamp::now().minus_minutes(window_minutes);
		event::count(&self.db, action, kind, identity, since).await
	}

	async fn clear(&self, action: &str) -> WdResult<()> {
		event::clear(&self.db, action).await
	}

	async fn list(&self, action: &str) -> WdResult<Vec<Event>> {
		event::list(&self.db, action).await
	}

	async fn purge(&self, older_than: Timestamp) -> WdResult<u64> {
		let removed = event::purge(&self.db, older_than).await?;
		if removed > 0 {
			debug!("Purged {} watchdog events older than {}", removed, older_than);
		}
		Ok(removed)
	}
}

// vim: ts=4
