//! In-memory event store.
//!
//! Keeps every event in a vector behind a lock. Meant for tests and for
//! single-process deployments where losing the history on restart is fine.
//! The clock can be replaced so that windows can be exercised without
//! waiting for real time to pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use watchdog_types::{event_store::EventStore, prelude::*, types::Event};

/// Source of the current time for the store
pub type ClockFn = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// A clock that only moves when told to
#[derive(Clone, Debug)]
pub struct ManualClock {
	now: Arc<AtomicI64>,
}

impl ManualClock {
	pub fn new(start: Timestamp) -> Self {
		Self { now: Arc::new(AtomicI64::new(start.0)) }
	}

	pub fn now(&self) -> Timestamp {
		Timestamp(self.now.load(Ordering::SeqCst))
	}

	pub fn advance_secs(&self, secs: i64) {
		self.now.fetch_add(secs, Ordering::SeqCst);
	}

	pub fn advance_minutes(&self, minutes: i64) {
		self.advance_secs(minutes * 60);
	}

	pub fn clock_fn(&self) -> ClockFn {
		let now = self.now.clone();
		Arc::new(move || Timestamp(now.load(Ordering::SeqCst)))
	}
}

#[derive(Debug, Default)]
struct State {
	events: Vec<Event>,
	next_id: i64,
	last_ts: Timestamp,
}

pub struct EventAdapterMemory {
	state: RwLock<State>,
	clock: ClockFn,
}

impl std::fmt::Debug for EventAdapterMemory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventAdapterMemory").field("events", &self.state.read().events.len()).finish()
	}
}

impl Default for EventAdapterMemory {
	fn default() -> Self {
		Self::new()
	}
}

impl EventAdapterMemory {
	pub fn new() -> Self {
		Self::with_clock(Arc::new(Timestamp::now))
	}

	pub fn with_clock(clock: ClockFn) -> Self {
		Self { state: RwLock::new(State { next_id: 1, ..State::default() }), clock }
	}

	/// Number of stored events across all actions
	pub fn len(&self) -> usize {
		self.state.read().events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.read().events.is_empty()
	}
}

#[async_trait]
impl EventStore for EventAdapterMemory {
	async fn insert(&self, action: &str, kind: EventKind, identity: &Identity) -> WdResult<()> {
		let now = (self.clock)();
		let mut state = self.state.write();

		// Wall clocks may step back, stored timestamps must not
		let created_at = now.max(state.last_ts);
		state.last_ts = created_at;

		let event_id = state.next_id;
		state.next_id += 1;
		state.events.push(Event {
			event_id,
			action: action.into(),
			kind,
			identity: identity.clone(),
			created_at,
		});

		Ok(())
	}

	async fn count(
		&self,
		action: &str,
		kind: EventKind,
		identity: &Identity,
		window_minutes: u32,
	) -> WdResult<u32> {
		let since = (self.clock)().minus_minutes(window_minutes);
		let state = self.state.read();

		let count = state
			.events
			.iter()
			.filter(|ev| {
				ev.kind == kind
					&& ev.created_at >= since
					&& &*ev.action == action
					&& identity.matches_identity(&ev.identity)
			})
			.count();

		Ok(u32::try_from(count).unwrap_or(u32::MAX))
	}

	async fn clear(&self, action: &str) -> WdResult<()> {
		self.state.write().events.retain(|ev| &*ev.action != action);
		Ok(())
	}

	async fn list(&self, action: &str) -> WdResult<Vec<Event>> {
		Ok(self.state.read().events.iter().filter(|ev| &*ev.action == action).cloned().collect())
	}

	async fn purge(&self, older_than: Timestamp) -> WdResult<u64> {
		let mut state = self.state.write();
		let before = state.events.len();
		state.events.retain(|ev| ev.created_at >= older_than);
		Ok((before - state.events.len()) as u64)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_timestamps_never_go_back() {
		let clock = ManualClock::new(Timestamp(1_000));
		let store = EventAdapterMemory::with_clock(clock.clock_fn());
		let identity = Identity::Ip("127.0.0.1".into());

		store.insert("login", EventKind::Log, &identity).await.unwrap();
		clock.advance_secs(-30);
		store.insert("login", EventKind::Log, &identity).await.unwrap();

		let events = store.list("login").await.unwrap();
		assert_eq!(events.len(), 2);
		assert_eq!(events[0].created_at, Timestamp(1_000));
		assert_eq!(events[1].created_at, Timestamp(1_000));
		assert!(events[0].event_id < events[1].event_id);
	}

	#[test]
	fn test_manual_clock() {
		let clock = ManualClock::new(Timestamp(0));
		let f = clock.clock_fn();
		clock.advance_minutes(2);
		assert_eq!(f(), Timestamp(120));
		assert_eq!(clock.now(), Timestamp(120));
	}
}

// vim: ts=4
