//! Watchdog Settings
//!
//! Thresholds and windows of a single watchdog. Every field has a default,
//! so a partial configuration document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchdogSettings {
	/// Number of actions tolerated within the analysis window before the
	/// client is flagged as suspect
	pub suspect_counter: u32,

	/// Enables bans
	pub ban_enabled: bool,

	/// Number of actions tolerated within the analysis window before a ban
	/// is instituted
	pub ban_counter: u32,

	/// Ban duration in minutes
	pub ban_time: u32,

	/// Analysis window in minutes
	pub find_time: u32,

	/// Count by IP address.
	///
	/// This is what catches bruteforce on a publicly reachable login form.
	pub ip_lookup: bool,

	/// Count by session id.
	///
	/// Only useful to stop an authenticated user from abusing a feature; an
	/// attacker on a login form simply drops the session cookie.
	pub session_lookup: bool,
}

impl Default for WatchdogSettings {
	fn default() -> Self {
		Self {
			suspect_counter: 5,
			ban_enabled: true,
			ban_counter: 20,
			ban_time: 10,
			find_time: 15,
			ip_lookup: true,
			session_lookup: true,
		}
	}
}

impl WatchdogSettings {
	/// Parse a (partial) JSON settings document, missing fields keep their
	/// defaults
	pub fn from_json(json: &str) -> WdResult<Self> {
		serde_json::from_str(json)
			.map_err(|err| Error::ValidationError(format!("invalid watchdog settings: {}", err)))
	}

	pub fn from_value(value: serde_json::Value) -> WdResult<Self> {
		serde_json::from_value(value)
			.map_err(|err| Error::ValidationError(format!("invalid watchdog settings: {}", err)))
	}

	pub fn with_suspect_counter(mut self, counter: u32) -> Self {
		self.suspect_counter = counter;
		self
	}

	pub fn with_ban_enabled(mut self, enabled: bool) -> Self {
		self.ban_enabled = enabled;
		self
	}

	pub fn with_ban_counter(mut self, counter: u32) -> Self {
		self.ban_counter = counter;
		self
	}

	pub fn with_ban_time(mut self, minutes: u32) -> Self {
		self.ban_time = minutes;
		self
	}

	pub fn with_find_time(mut self, minutes: u32) -> Self {
		self.find_time = minutes;
		self
	}

	pub fn with_ip_lookup(mut self, enabled: bool) -> Self {
		self.ip_lookup = enabled;
		self
	}

	pub fn with_session_lookup(mut self, enabled: bool) -> Self {
		self.session_lookup = enabled;
		self
	}

	/// How far back events still matter to any decision, in minutes
	pub fn retention_minutes(&self) -> u32 {
		if self.ban_enabled { self.find_time.max(self.ban_time) } else { self.find_time }
	}

	pub fn validate(&self) -> WdResult<()> {
		if !self.ip_lookup && !self.session_lookup {
			return Err(Error::ConfigError("No lookup method was specified".into()));
		}
		if self.suspect_counter == 0 {
			return Err(Error::ConfigError("suspect_counter must be at least 1".into()));
		}
		if self.ban_enabled && self.ban_counter == 0 {
			return Err(Error::ConfigError("ban_counter must be at least 1".into()));
		}
		if self.ban_enabled && self.ban_counter < self.suspect_counter {
			warn!(
				"Watchdog ban_counter ({}) is below suspect_counter ({}), clients are banned before they are suspect",
				self.ban_counter, self.suspect_counter
			);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let settings = WatchdogSettings::default();
		assert_eq!(settings.suspect_counter, 5);
		assert!(settings.ban_enabled);
		assert_eq!(settings.ban_counter, 20);
		assert_eq!(settings.ban_time, 10);
		assert_eq!(settings.find_time, 15);
		assert!(settings.ip_lookup);
		assert!(settings.session_lookup);
		assert!(settings.validate().is_ok());
	}

	#[test]
	fn test_partial_json_merges_over_defaults() {
		let settings =
			WatchdogSettings::from_json(r#"{ "ban_counter": 10, "session_lookup": false }"#)
				.unwrap();
		assert_eq!(settings.ban_counter, 10);
		assert!(!settings.session_lookup);
		assert_eq!(settings.suspect_counter, 5);
		assert_eq!(settings.find_time, 15);
	}

	#[test]
	fn test_invalid_json() {
		let res = WatchdogSettings::from_value(serde_json::json!({ "ban_time": "ten" }));
		assert!(matches!(res, Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_unknown_keys_rejected() {
		let res = WatchdogSettings::from_json(
			r#"{ "banCounter": 3, "suspectCounter": 2, "ban_countr": 4 }"#,
		);
		assert!(matches!(res, Err(Error::ValidationError(_))));

		let res = WatchdogSettings::from_value(serde_json::json!({ "ban_countr": 4 }));
		assert!(matches!(res, Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_both_lookups_disabled() {
		let settings =
			WatchdogSettings::default().with_ip_lookup(false).with_session_lookup(false);
		assert!(matches!(settings.validate(), Err(Error::ConfigError(_))));

		assert!(WatchdogSettings::default().with_ip_lookup(false).validate().is_ok());
		assert!(WatchdogSettings::default().with_session_lookup(false).validate().is_ok());
	}

	#[test]
	fn test_zero_counters() {
		assert!(WatchdogSettings::default().with_suspect_counter(0).validate().is_err());
		assert!(WatchdogSettings::default().with_ban_counter(0).validate().is_err());
		// Ban counter is irrelevant when bans are off
		assert!(
			WatchdogSettings::default()
				.with_ban_enabled(false)
				.with_ban_counter(0)
				.validate()
				.is_ok()
		);
	}

	#[test]
	fn test_retention_minutes() {
		let settings = WatchdogSettings::default().with_ban_time(60);
		assert_eq!(settings.retention_minutes(), 60);
		assert_eq!(settings.with_ban_enabled(false).retention_minutes(), 15);
	}
}

// vim: ts=4
