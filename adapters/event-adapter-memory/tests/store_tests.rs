//! Event store contract tests for the in-memory adapter

use watchdog_event_adapter_memory::{EventAdapterMemory, ManualClock};
use watchdog_types::event_store::EventStore;
use watchdog_types::prelude::*;

fn create_test_store() -> (EventAdapterMemory, ManualClock) {
	let clock = ManualClock::new(Timestamp(1_700_000_000));
	let store = EventAdapterMemory::with_clock(clock.clock_fn());
	(store, clock)
}

fn ip(addr: &str) -> Identity {
	Identity::Ip(addr.into())
}

#[tokio::test]
async fn test_insert_increments_count_by_one() {
	let (store, _clock) = create_test_store();
	let identity = ip("127.0.0.1");

	for expected in 1..=3 {
		store.insert("default", EventKind::Log, &identity).await.unwrap();
		let count = store.count("default", EventKind::Log, &identity, 0).await.unwrap();
		assert_eq!(count, expected);
	}
}

#[tokio::test]
async fn test_count_filters_by_kind_and_identity() {
	let (store, _clock) = create_test_store();
	let local = ip("127.0.0.1");

	for _ in 0..5 {
		store.insert("default", EventKind::Log, &local).await.unwrap();
	}
	store.insert("default", EventKind::Log, &ip("255.255.255.255")).await.unwrap();
	store.insert("default", EventKind::Ban, &local).await.unwrap();

	assert_eq!(store.count("default", EventKind::Log, &local, 10).await.unwrap(), 5);
	assert_eq!(store.count("default", EventKind::Ban, &local, 10).await.unwrap(), 1);
	assert_eq!(store.count("default", EventKind::Ban, &ip("255.255.255.255"), 10).await.unwrap(), 0);
}

#[tokio::test]
async fn test_window_excludes_stale_events() {
	let (store, clock) = create_test_store();
	let identity = ip("127.0.0.1");

	store.insert("default", EventKind::Log, &identity).await.unwrap();
	clock.advance_secs(1);
	assert_eq!(store.count("default", EventKind::Log, &identity, 0).await.unwrap(), 0);
	assert_eq!(store.count("default", EventKind::Log, &identity, 1).await.unwrap(), 1);

	clock.advance_minutes(15);
	assert_eq!(store.count("default", EventKind::Log, &identity, 15).await.unwrap(), 0);
}

#[tokio::test]
async fn test_identity_matches_by_ip_or_session() {
	let (store, _clock) = create_test_store();

	for _ in 0..5 {
		store.insert("default", EventKind::Log, &ip("1.1.1.1")).await.unwrap();
	}
	store.insert("default", EventKind::Log, &Identity::Session("X".into())).await.unwrap();
	store.insert("default", EventKind::Log, &Identity::Session("Y".into())).await.unwrap();

	let both = Identity::new(Some("1.1.1.1"), Some("X")).unwrap();
	assert_eq!(store.count("default", EventKind::Log, &both, 15).await.unwrap(), 6);

	let other_session = Identity::new(Some("1.1.1.1"), Some("Z")).unwrap();
	assert_eq!(store.count("default", EventKind::Log, &other_session, 15).await.unwrap(), 5);
}

#[tokio::test]
async fn test_clear_removes_only_the_action() {
	let (store, _clock) = create_test_store();
	let identity = Identity::new(Some("127.0.0.1"), Some("abc")).unwrap();

	store.insert("login", EventKind::Log, &identity).await.unwrap();
	store.insert("login", EventKind::Ban, &ip("10.0.0.1")).await.unwrap();
	store.insert("comment", EventKind::Log, &identity).await.unwrap();

	store.clear("login").await.unwrap();
	// Clearing twice is fine
	store.clear("login").await.unwrap();

	for kind in [EventKind::Log, EventKind::Ban] {
		assert_eq!(store.count("login", kind, &identity, 15).await.unwrap(), 0);
		assert_eq!(store.count("login", kind, &ip("10.0.0.1"), 15).await.unwrap(), 0);
	}
	assert_eq!(store.count("comment", EventKind::Log, &identity, 15).await.unwrap(), 1);
	assert!(store.list("login").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_purge_removes_old_events() {
	let (store, clock) = create_test_store();
	let identity = ip("127.0.0.1");

	store.insert("login", EventKind::Log, &identity).await.unwrap();
	store.insert("comment", EventKind::Log, &identity).await.unwrap();
	clock.advance_minutes(30);
	store.insert("login", EventKind::Log, &identity).await.unwrap();

	let removed = store.purge(clock.now().minus_minutes(15)).await.unwrap();
	assert_eq!(removed, 2);
	assert_eq!(store.len(), 1);
	assert_eq!(store.list("login").await.unwrap()[0].created_at, clock.now());
}

// vim: ts=4
