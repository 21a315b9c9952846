//! Identity provider with a fixed identity

use std::net::IpAddr;

use crate::prelude::*;
use watchdog_types::identity_provider::IdentityProvider;

/// Fixed client identity, for background jobs and tests
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity {
	ip_address: Option<IpAddr>,
	session_id: Option<Box<str>>,
}

impl StaticIdentity {
	pub fn new(ip_address: Option<IpAddr>, session_id: Option<&str>) -> Self {
		Self { ip_address, session_id: session_id.map(Box::from) }
	}

	pub fn ip(ip_address: IpAddr) -> Self {
		Self { ip_address: Some(ip_address), session_id: None }
	}

	pub fn session(session_id: &str) -> Self {
		Self { ip_address: None, session_id: Some(session_id.into()) }
	}

	pub fn with_session(mut self, session_id: &str) -> Self {
		self.session_id = Some(session_id.into());
		self
	}
}

impl IdentityProvider for StaticIdentity {
	fn ip_address(&self) -> WdResult<IpAddr> {
		self.ip_address
			.ok_or_else(|| Error::IdentityResolution("no remote address available".into()))
	}

	fn session_id(&self) -> Option<Box<str>> {
		self.session_id.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::net::Ipv4Addr;

	#[test]
	fn test_static_identity() {
		let identity = StaticIdentity::ip(IpAddr::V4(Ipv4Addr::LOCALHOST)).with_session("abc");
		assert_eq!(identity.ip_address(), Ok(IpAddr::V4(Ipv4Addr::LOCALHOST)));
		assert_eq!(identity.session_id().as_deref(), Some("abc"));
		assert!(identity.has_active_session());

		let session_only = StaticIdentity::session("abc");
		assert!(matches!(session_only.ip_address(), Err(Error::IdentityResolution(_))));
	}
}

// vim: ts=4
