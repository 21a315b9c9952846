//! Watchdog Policy Engine
//!
//! Decides whether the current client is suspect or banned for one action,
//! purely from windowed event counts in the event store. There is no stored
//! "banned until" state: a ban is a ban event younger than `ban_time`, so it
//! lapses on its own and every further qualifying attempt re-arms it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::settings::WatchdogSettings;
use watchdog_types::event_store::EventStore;
use watchdog_types::identity_provider::IdentityProvider;

/// Classification of a client for one action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchdogStatus {
	/// Below the suspect threshold
	Clean,
	/// Suspect threshold reached, no active ban. Ask for a captcha.
	Suspect,
	/// Active ban. The action should not be allowed to proceed.
	Banned,
}

impl std::fmt::Display for WatchdogStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			WatchdogStatus::Clean => write!(f, "clean"),
			WatchdogStatus::Suspect => write!(f, "suspect"),
			WatchdogStatus::Banned => write!(f, "banned"),
		}
	}
}

/// Abuse detector bound to one action
///
/// Cheap to clone; the store and identity provider are shared handles.
#[derive(Clone, Debug)]
pub struct Watchdog {
	action: Box<str>,
	store: Arc<dyn EventStore>,
	identity: Arc<dyn IdentityProvider>,
	settings: WatchdogSettings,
}

impl Watchdog {
	pub fn new(
		action: impl Into<Box<str>>,
		store: Arc<dyn EventStore>,
		identity: Arc<dyn IdentityProvider>,
		settings: WatchdogSettings,
	) -> WdResult<Self> {
		let action = action.into();
		if action.is_empty() {
			return Err(Error::ConfigError("action name must not be empty".into()));
		}
		settings.validate()?;

		Ok(Self { action, store, identity, settings })
	}

	/// Same watchdog, resolving the client through another identity provider
	pub fn with_identity(&self, identity: Arc<dyn IdentityProvider>) -> Self {
		Self {
			action: self.action.clone(),
			store: self.store.clone(),
			identity,
			settings: self.settings.clone(),
		}
	}

	pub fn action(&self) -> &str {
		&self.action
	}

	pub fn settings(&self) -> &WatchdogSettings {
		&self.settings
	}

	/// Records an attempt of the action by the current client.
	///
	/// Call it every time the protected feature is used, or when something
	/// goes wrong (e.g. a wrong password). Once the client reaches
	/// `ban_counter` within `find_time`, every call also records a ban
	/// event, which restarts the ban period.
	pub async fn log(&self) -> WdResult<()> {
		let identity = self.resolve_identity()?;

		self.store.insert(&self.action, EventKind::Log, &identity).await?;
		debug!("Watchdog '{}' logged attempt by {}", self.action, identity);

		if !self.settings.ban_enabled {
			return Ok(());
		}

		let count = self.count_logs(&identity).await?;
		if count >= self.settings.ban_counter {
			self.store.insert(&self.action, EventKind::Ban, &identity).await?;
			warn!(
				"Watchdog '{}' banned {} for {} minutes ({} attempts in {} minutes)",
				self.action, identity, self.settings.ban_time, count, self.settings.find_time
			);
		}

		Ok(())
	}

	/// Whether the current client reached `suspect_counter` attempts within
	/// `find_time`.
	///
	/// If true, asking the client to solve a captcha is highly recommended.
	pub async fn is_suspect(&self) -> WdResult<bool> {
		let identity = self.resolve_identity()?;
		self.check_suspect(&identity).await
	}

	/// Whether the current client has an active ban.
	///
	/// If true, the requested action should not be completed.
	pub async fn is_banned(&self) -> WdResult<bool> {
		if !self.settings.ban_enabled {
			return Ok(false);
		}
		let identity = self.resolve_identity()?;
		self.check_banned(&identity).await
	}

	/// Classifies the current client, resolving its identity once
	pub async fn status(&self) -> WdResult<WatchdogStatus> {
		let identity = self.resolve_identity()?;

		if self.settings.ban_enabled && self.check_banned(&identity).await? {
			Ok(WatchdogStatus::Banned)
		} else if self.check_suspect(&identity).await? {
			Ok(WatchdogStatus::Suspect)
		} else {
			Ok(WatchdogStatus::Clean)
		}
	}

	/// Erases the whole log of this action.
	///
	/// This affects every client, not only the current one, and removes
	/// active bans as well.
	pub async fn clear_log(&self) -> WdResult<()> {
		self.store.clear(&self.action).await?;
		info!("Watchdog '{}' log cleared", self.action);
		Ok(())
	}

	async fn check_suspect(&self, identity: &Identity) -> WdResult<bool> {
		Ok(self.count_logs(identity).await? >= self.settings.suspect_counter)
	}

	async fn check_banned(&self, identity: &Identity) -> WdResult<bool> {
		let bans =
			self.store.count(&self.action, EventKind::Ban, identity, self.settings.ban_time).await?;
		Ok(bans >= 1)
	}

	async fn count_logs(&self, identity: &Identity) -> WdResult<u32> {
		self.store.count(&self.action, EventKind::Log, identity, self.settings.find_time).await
	}

	/// Collects the enabled lookup keys from the identity provider
	fn resolve_identity(&self) -> WdResult<Identity> {
		let ip_address = if self.settings.ip_lookup {
			let ip = self.identity.ip_address().map_err(|err| match err {
				Error::IdentityResolution(_) => err,
				err => Error::IdentityResolution(err.to_string()),
			})?;
			Some(ip.to_string())
		} else {
			None
		};

		let session_id = if self.settings.session_lookup && self.identity.has_active_session() {
			self.identity.session_id()
		} else {
			None
		};

		Identity::new(ip_address, session_id)
	}
}

// vim: ts=4
