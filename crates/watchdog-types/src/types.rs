//! Common types used throughout the watchdog.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::prelude::*;

// Timestamp //
//***********//
/// Unix timestamp in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		now()
	}

	/// Timestamp `secs` seconds from now (negative values point to the past)
	pub fn from_now(secs: i64) -> Timestamp {
		Timestamp(now().0.saturating_add(secs))
	}

	pub fn add_seconds(&self, secs: i64) -> Timestamp {
		Timestamp(self.0.saturating_add(secs))
	}

	/// Start of a window reaching `minutes` back from this timestamp
	pub fn minus_minutes(&self, minutes: u32) -> Timestamp {
		Timestamp(self.0.saturating_sub(i64::from(minutes) * 60))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

pub fn now() -> Timestamp {
	let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
	Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
}

// EventKind //
//***********//
/// Kind of a recorded event
///
/// `Log` is written for every attempt, `Ban` only when a ban is instituted
/// (or re-armed), so "is banned" becomes "at least one ban event in the ban
/// window".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	Log,
	Ban,
}

impl EventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			EventKind::Log => "log",
			EventKind::Ban => "ban",
		}
	}
}

impl std::fmt::Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for EventKind {
	type Err = Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"log" => Ok(EventKind::Log),
			"ban" => Ok(EventKind::Ban),
			_ => Err(Error::ValidationError(format!("invalid event kind: {}", s))),
		}
	}
}

// Event //
//*******//
/// A single recorded occurrence of an action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	/// Store-assigned identifier
	pub event_id: i64,
	/// Name of the protected operation (e.g. "login")
	pub action: Box<str>,
	pub kind: EventKind,
	pub identity: Identity,
	/// Store-assigned creation time
	pub created_at: Timestamp,
}


// vim: ts=4
