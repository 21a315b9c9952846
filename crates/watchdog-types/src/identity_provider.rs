//! Source of the client identity for the current request.

use std::fmt::Debug;
use std::net::IpAddr;
use std::sync::Arc;

use crate::prelude::*;

/// Resolves the IP address and session id of the current client
///
/// Implementations are usually built per request (see the axum extractor in
/// the `watchdog` crate) or hold a fixed identity.
pub trait IdentityProvider: Debug + Send + Sync {
	/// Remote address of the client.
	///
	/// Fails with `Error::IdentityResolution` if it is not available.
	fn ip_address(&self) -> WdResult<IpAddr>;

	/// Current session id, `None` if there is no session
	fn session_id(&self) -> Option<Box<str>>;

	fn has_active_session(&self) -> bool {
		self.session_id().is_some()
	}
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
	fn ip_address(&self) -> WdResult<IpAddr> {
		(**self).ip_address()
	}

	fn session_id(&self) -> Option<Box<str>> {
		(**self).session_id()
	}

	fn has_active_session(&self) -> bool {
		(**self).has_active_session()
	}
}

// vim: ts=4
