//! Adapter that persists watchdog events.
//!
//! The store is the only stateful part of the watchdog: the engine derives
//! every decision from windowed counts over the events kept here. Any backend
//! that can append, count with a filter and delete fits (relational table,
//! key-value store, in-memory list).

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::Event;

/// A watchdog event store
///
/// Every `EventStore` implementation is required to implement this trait.
/// Timestamps are assigned by the store at insert time and must be
/// non-decreasing per store instance. Stores do not expire events on their
/// own; windows are applied when counting.
#[async_trait]
pub trait EventStore: Debug + Send + Sync {
	/// Records one event stamped with the store's current time
	async fn insert(&self, action: &str, kind: EventKind, identity: &Identity) -> WdResult<()>;

	/// Counts events of `action` and `kind` created within the last
	/// `window_minutes` minutes whose IP address OR session id matches
	/// `identity`
	async fn count(
		&self,
		action: &str,
		kind: EventKind,
		identity: &Identity,
		window_minutes: u32,
	) -> WdResult<u32>;

	/// Deletes every event of `action`, of all kinds and identities
	async fn clear(&self, action: &str) -> WdResult<()>;

	/// Lists the events of `action`, oldest first
	async fn list(&self, action: &str) -> WdResult<Vec<Event>>;

	/// Deletes events of all actions created before `older_than`, returning
	/// the number of removed events
	async fn purge(&self, older_than: Timestamp) -> WdResult<u64>;
}

// vim: ts=4
