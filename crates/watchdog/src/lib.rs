//! Simple bruteforce and feature abuse detection based on IP address and/or
//! session id.
//!
//! A [`Watchdog`] is bound to one action (e.g. "login"). Call
//! [`Watchdog::log`] on every attempt (or every failure) and check
//! [`Watchdog::is_suspect`] / [`Watchdog::is_banned`] before letting the
//! action proceed. Decisions are computed from windowed event counts kept in
//! an [`EventStore`]; see the `watchdog-event-adapter-*` crates.
//!
//! Errors should make the caller fail closed: treat the client as banned
//! when the watchdog cannot answer.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod extract;
pub mod identity;
pub mod prelude;
pub mod settings;
pub mod watchdog;

pub use extract::{ActiveSession, IdentityConfig, IdentityConfigSource, ProxyMode, RequestIdentity};
pub use identity::StaticIdentity;
pub use settings::WatchdogSettings;
pub use watchdog::{Watchdog, WatchdogStatus};

pub use watchdog_types::{
	error::{Error, WdResult},
	event_store::EventStore,
	identity::Identity,
	identity_provider::IdentityProvider,
	types::{Event, EventKind, Timestamp},
};

// vim: ts=4
