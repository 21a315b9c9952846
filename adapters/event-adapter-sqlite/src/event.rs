//! Event queries

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::utils::*;
use watchdog_types::{prelude::*, types::Event};

/// Append the OR-based identity predicate to a query
fn push_identity<'a>(query: &mut QueryBuilder<'a, Sqlite>, identity: &'a Identity) {
	match identity {
		Identity::Ip(ip) => {
			query.push(" AND ip_address = ").push_bind(&**ip);
		}
		Identity::Session(session) => {
			query.push(" AND session_id = ").push_bind(&**session);
		}
		Identity::Both { ip_address, session_id } => {
			query
				.push(" AND (ip_address = ")
				.push_bind(&**ip_address)
				.push(" OR session_id = ")
				.push_bind(&**session_id)
				.push(")");
		}
	}
}

fn row_to_event(row: &SqliteRow) -> WdResult<Event> {
	let event_id: i64 = row.try_get("event_id").map_err(db_err)?;
	let action: &str = row.try_get("action").map_err(db_err)?;
	let kind: &str = row.try_get("kind").map_err(db_err)?;
	let ip_address: Option<&str> = row.try_get("ip_address").map_err(db_err)?;
	let session_id: Option<&str> = row.try_get("session_id").map_err(db_err)?;
	let created_at: i64 = row.try_get("created_at").map_err(db_err)?;

	let identity = Identity::new(ip_address, session_id).map_err(|_| {
		Error::ValidationError(format!("event {} has no identity", event_id))
	})?;

	Ok(Event {
		event_id,
		action: action.into(),
		kind: kind.parse()?,
		identity,
		created_at: Timestamp(created_at),
	})
}

pub(crate) async fn insert(
	db: &SqlitePool,
	action: &str,
	kind: EventKind,
	identity: &Identity,
	created_at: Timestamp,
) -> WdResult<()> {
	sqlx::query(
		"INSERT INTO watchdog_events (action, kind, ip_address, session_id, created_at) \
		VALUES (?1, ?2, ?3, ?4, ?5)",
	)
	.bind(action)
	.bind(kind.as_str())
	.bind(identity.ip_address())
	.bind(identity.session_id())
	.bind(created_at.0)
	.execute(db)
	.await
	.map_err(db_err)?;

	Ok(())
}

pub(crate) async fn count(
	db: &SqlitePool,
	action: &str,
	kind: EventKind,
	identity: &Identity,
	since: Timestamp,
) -> WdResult<u32> {
	let mut query: QueryBuilder<'_, Sqlite> =
		QueryBuilder::new("SELECT count(*) FROM watchdog_events WHERE action = ");
	query
		.push_bind(action)
		.push(" AND kind = ")
		.push_bind(kind.as_str())
		.push(" AND created_at >= ")
		.push_bind(since.0);
	push_identity(&mut query, identity);

	let count: i64 = query.build_query_scalar::<i64>().fetch_one(db).await.map_err(db_err)?;
	u32::try_from(count).or(Err(Error::DbError))
}

pub(crate) async fn clear(db: &SqlitePool, action: &str) -> WdResult<()> {
	sqlx::query("DELETE FROM watchdog_events WHERE action = ?1")
		.bind(action)
		.execute(db)
		.await
		.map_err(db_err)?;

	Ok(())
}

pub(crate) async fn list(db: &SqlitePool, action: &str) -> WdResult<Vec<Event>> {
	let rows = sqlx::query(
		"SELECT event_id, action, kind, ip_address, session_id, created_at \
		FROM watchdog_events WHERE action = ?1 ORDER BY created_at, event_id",
	)
	.bind(action)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	rows.iter().map(row_to_event).collect()
}

pub(crate) async fn purge(db: &SqlitePool, older_than: Timestamp) -> WdResult<u64> {
	let res = sqlx::query("DELETE FROM watchdog_events WHERE created_at < ?1")
		.bind(older_than.0)
		.execute(db)
		.await
		.map_err(db_err)?;

	Ok(res.rows_affected())
}

// vim: ts=4
